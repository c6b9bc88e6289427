//! 依檔案角色分派到對應的外部轉換。

use std::fs;
use std::path::Path;

use crate::error::TransformResult;
use crate::service::script::{ScriptProfile, ScriptService};
use crate::service::style::StyleService;
use crate::service::traits::i_service::{ScriptServiceTrait, StyleServiceTrait};
use crate::utils::file::extension_of;

/// 以副檔名判斷的檔案角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Html,
    Script,
    Stylesheet,
    Asset,
}

impl FileRole {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => FileRole::Html,
            "js" => FileRole::Script,
            "css" => FileRole::Stylesheet,
            _ => FileRole::Asset,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        FileRole::from_extension(&extension_of(path))
    }

    /// 最後的資源複製步驟只處理一般資源，html/htm/js/css 一律不複製
    pub fn is_fallback_copied(self) -> bool {
        self == FileRole::Asset
    }
}

/// 轉換能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Script { profile: ScriptProfile, module: bool },
    Stylesheet,
    Passthrough,
}

impl From<FileRole> for Capability {
    fn from(role: FileRole) -> Self {
        match role {
            FileRole::Script => Capability::Script {
                profile: ScriptProfile::File,
                module: false,
            },
            FileRole::Stylesheet => Capability::Stylesheet,
            FileRole::Html | FileRole::Asset => Capability::Passthrough,
        }
    }
}

pub struct TransformDispatch {
    script: Box<dyn ScriptServiceTrait>,
    style: Box<dyn StyleServiceTrait>,
}

impl TransformDispatch {
    pub fn new(script: Box<dyn ScriptServiceTrait>, style: Box<dyn StyleServiceTrait>) -> Self {
        TransformDispatch { script, style }
    }

    pub fn transform(&self, capability: Capability, source: &str) -> TransformResult<String> {
        match capability {
            Capability::Script { profile, module } => self.script.obfuscate(source, profile, module),
            Capability::Stylesheet => self.style.minify(source),
            Capability::Passthrough => Ok(source.to_string()),
        }
    }

    /// 讀取檔案並轉換；一般資源原樣回傳位元組
    pub fn transform_file(&self, path: &Path, capability: Capability) -> TransformResult<Vec<u8>> {
        let bytes = fs::read(path)?;
        match capability {
            Capability::Passthrough => Ok(bytes),
            _ => {
                let source = String::from_utf8_lossy(&bytes);
                Ok(self.transform(capability, &source)?.into_bytes())
            }
        }
    }
}

impl Default for TransformDispatch {
    fn default() -> Self {
        TransformDispatch::new(Box::new(ScriptService::new()), Box::new(StyleService::new()))
    }
}
