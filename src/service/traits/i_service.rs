use std::io;

use crate::error::TransformResult;
use crate::models::fingerprint::{FingerprintInput, FingerprintOutput};
use crate::models::html::{HtmlRewriteInput, HtmlRewriteOutput};
use crate::models::pipeline::PipelineContext;
use crate::service::script::ScriptProfile;

// Script 服務接口，負責 JavaScript 混淆
pub trait ScriptServiceTrait: Send + Sync {
    /// 依設定檔混淆 JavaScript 原始碼
    /// # 參數
    /// - source: 原始碼
    /// - profile: 外部檔案使用強力設定，內嵌腳本使用最小設定
    /// - module: 是否以 ES module 解析
    fn obfuscate(&self, source: &str, profile: ScriptProfile, module: bool) -> TransformResult<String>;
}

// Style 服務接口，負責 CSS 壓縮
pub trait StyleServiceTrait: Send + Sync {
    fn minify(&self, source: &str) -> TransformResult<String>;
}

// HTML 服務接口，負責改寫單一 HTML 文件
pub trait HtmlServiceTrait: Send + Sync {
    /// 處理文件中的腳本與樣式，寫出轉換後的外部資源，回傳改寫後的 HTML
    /// # 回傳
    /// - HTML 內容、其輸出路徑與已處理的資源清單；HTML 本身尚未寫出
    fn rewrite(&self, input: HtmlRewriteInput, ctx: &PipelineContext) -> io::Result<HtmlRewriteOutput>;
}

// 指紋擾動服務接口
pub trait FingerprintServiceTrait: Send + Sync {
    fn perturb(&self, input: FingerprintInput) -> io::Result<FingerprintOutput>;
}
