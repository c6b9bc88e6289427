use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::path_map::{PathMapper, StructureMode};

/// 已寫入輸出目錄的輸入檔案（絕對路徑），最後的資源複製步驟會略過它們
#[derive(Debug, Default, Clone)]
pub struct HandledSet {
    paths: HashSet<PathBuf>,
}

impl HandledSet {
    pub fn new() -> Self {
        HandledSet::default()
    }

    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// 單次執行的上下文
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// 使用者指定的輸入（檔案或目錄），已正規化為絕對路徑
    pub input: PathBuf,
    /// 計算相對路徑用的根目錄：輸入為檔案時為其所在目錄
    pub input_root: PathBuf,
    pub mapper: PathMapper,
    pub minify_css: bool,
    pub handled: HandledSet,
}

impl PipelineContext {
    pub fn new(
        input: PathBuf,
        input_root: PathBuf,
        output_root: PathBuf,
        mode: StructureMode,
        minify_css: bool,
    ) -> Self {
        let mapper = PathMapper::new(input_root.clone(), output_root, mode);
        PipelineContext {
            input,
            input_root,
            mapper,
            minify_css,
            handled: HandledSet::new(),
        }
    }

    pub fn output_root(&self) -> &Path {
        self.mapper.output_root()
    }
}

#[derive(Debug, Default, Clone)]
pub struct PipelineOutput {
    pub output_root: PathBuf,
    pub html_written: usize,
    pub scripts_obfuscated: usize,
    pub styles_minified: usize,
    pub assets_copied: usize,
    pub failures: usize,
}
