use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct HtmlRewriteInput {
    pub html_path: PathBuf,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct HtmlRewriteOutput {
    pub html: String,
    /// HTML 本身的輸出路徑
    pub output_path: PathBuf,
    /// 已轉換並寫出的外部資源（輸入端絕對路徑）
    pub handled: Vec<PathBuf>,
    pub scripts_obfuscated: usize,
    pub styles_minified: usize,
    pub failures: usize,
}
