use std::io;
use std::path::PathBuf;

use crate::models::path_map::StructureMode;
use crate::models::pipeline::PipelineOutput;

// 應用配置結構體，封裝混淆流程的所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub structure: StructureMode,
    pub minify_css: bool,
    pub no_progress: bool,
}

// 指紋擾動工具的配置
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub target: PathBuf,
    pub ignored_dirs: Vec<String>,
    pub no_progress: bool,
}

/// 預設略過的建置／相依目錄
pub const DEFAULT_IGNORED_DIRS: [&str; 5] = ["node_modules", ".git", "dist", "build", "out"];

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 混淆流程執行的 Port
pub trait PipelinePort {
    fn execute(&self, config: AppConfig) -> io::Result<PipelineOutput>;
}
