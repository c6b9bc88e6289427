//! JavaScript 混淆，使用 oxc 的解析器、壓縮器與識別字重新命名。
//!
//! 外部腳本檔使用完整壓縮；內嵌腳本通常是短小的啟動程式碼，只做識別字重新命名
//! 與緊湊輸出。一般 script 以 classic script 解析，頂層宣告是全域名稱，會被其他
//! script 或 onclick 之類的屬性使用，因此兩種設定都不移除也不重新命名頂層宣告。
//! 只有 type="module" 以 module 解析。

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::error::{TransformError, TransformResult};
use crate::service::traits::i_service::ScriptServiceTrait;

/// 混淆設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptProfile {
    /// 外部 .js 檔：緊湊輸出、完整壓縮、識別字重新命名
    File,
    /// 內嵌 <script>：緊湊輸出與識別字重新命名
    Inline,
}

impl ScriptProfile {
    fn minifier_options(self) -> MinifierOptions {
        let mangle = MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        };
        match self {
            ScriptProfile::File => MinifierOptions {
                mangle: Some(mangle),
                compress: Some(CompressOptions::smallest()),
            },
            ScriptProfile::Inline => MinifierOptions {
                mangle: Some(mangle),
                compress: None,
            },
        }
    }
}

/// classic script 的頂層宣告在壓縮時會被保留；module 的頂層宣告屬於模組私有
fn source_type(module: bool) -> SourceType {
    if module {
        SourceType::mjs()
    } else {
        SourceType::script()
    }
}

pub struct ScriptService;

impl ScriptService {
    pub fn new() -> Self {
        ScriptService
    }
}

impl Default for ScriptService {
    fn default() -> Self {
        ScriptService::new()
    }
}

impl ScriptServiceTrait for ScriptService {
    fn obfuscate(&self, source: &str, profile: ScriptProfile, module: bool) -> TransformResult<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type(module)).parse();
        if !ret.errors.is_empty() {
            return Err(TransformError::Script {
                errors: ret.errors.len(),
            });
        }
        let mut program = ret.program;
        let ret = Minifier::new(profile.minifier_options()).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}
