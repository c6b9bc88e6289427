//! 輸出路徑對應：決定每個輸入檔案在輸出目錄下的位置。
//!
//! 攤平模式下，不同目錄中同名的檔案會對應到同一個輸出路徑，後寫入者覆蓋前者。
//! 這是已知的限制，保留原本的行為。

use std::path::{Component, Path, PathBuf};

use pathdiff::diff_paths;

/// 目錄結構保留模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureMode {
    Preserve,
    Flatten,
}

impl StructureMode {
    pub fn from_keep_structure(keep_structure: bool) -> Self {
        if keep_structure {
            StructureMode::Preserve
        } else {
            StructureMode::Flatten
        }
    }
}

/// 輸出檔案的種類，決定攤平模式下的檔名前綴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Html,
    Script,
    Stylesheet,
    Asset,
}

impl OutputKind {
    pub fn flatten_prefix(self) -> &'static str {
        match self {
            OutputKind::Html | OutputKind::Script => "obf_",
            OutputKind::Stylesheet => "min_",
            OutputKind::Asset => "",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathMapper {
    input_root: PathBuf,
    output_root: PathBuf,
    mode: StructureMode,
}

impl PathMapper {
    pub fn new(input_root: PathBuf, output_root: PathBuf, mode: StructureMode) -> Self {
        PathMapper {
            input_root,
            output_root,
            mode,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// 計算輸入檔案的輸出路徑，結果一定位於輸出目錄之下
    pub fn map(&self, input: &Path, kind: OutputKind) -> PathBuf {
        match self.mode {
            StructureMode::Preserve => match self.relative_to_root(input) {
                Some(rel) => self.output_root.join(rel),
                None => {
                    log::warn!("檔案位於輸入根目錄之外，改用攤平命名：{}", input.display());
                    self.flattened(input, kind)
                }
            },
            StructureMode::Flatten => self.flattened(input, kind),
        }
    }

    /// 保留模式下一般資源的輸出路徑；不在輸入根目錄內時回傳 None
    pub fn mirror(&self, input: &Path) -> Option<PathBuf> {
        self.relative_to_root(input).map(|rel| self.output_root.join(rel))
    }

    fn flattened(&self, input: &Path, kind: OutputKind) -> PathBuf {
        let base = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.output_root
            .join(format!("{}{}", kind.flatten_prefix(), base))
    }

    fn relative_to_root(&self, input: &Path) -> Option<PathBuf> {
        let rel = input.strip_prefix(&self.input_root).ok()?;
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || rel.as_os_str().is_empty() {
            None
        } else {
            Some(rel.to_path_buf())
        }
    }
}

/// 由 HTML 輸出位置到資源輸出位置的相對引用，一律使用 `/` 分隔
pub fn relative_reference(html_output: &Path, asset_output: &Path) -> String {
    let base = html_output.parent().unwrap_or(html_output);
    let rel = diff_paths(asset_output, base).unwrap_or_else(|| asset_output.to_path_buf());
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
