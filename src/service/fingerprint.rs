//! 指紋擾動：就地修改檔案內容，使校驗和改變而不影響檔案的行為。
//!
//! 圖片寫入隨機的 EXIF 註解；可加註解的文字檔在開頭插入隨機註解；
//! 其餘檔案只在結尾附加一個換行或空白，JSON 等結構化格式因此維持有效。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info, warn};
use walkdir::WalkDir;

use crate::error::{TransformError, TransformResult};
use crate::models::fingerprint::{FingerprintInput, FingerprintOutput};
use crate::service::traits::i_service::FingerprintServiceTrait;
use crate::utils::file::extension_of;
use crate::utils::utils::{generate_random_string, ProgressManager};

const COMMENT_RANDOM_LEN: usize = 30;
const EXIF_RANDOM_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `<!-- ... -->`
    Html,
    /// `// ...`
    Line,
}

impl CommentStyle {
    fn render(self, body: &str) -> String {
        match self {
            CommentStyle::Block => format!("/* {} */\n", body),
            CommentStyle::Html => format!("<!-- {} -->\n", body),
            CommentStyle::Line => format!("// {}\n", body),
        }
    }
}

/// 依副檔名分類的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Commentable(CommentStyle),
    /// 沒有註解語法的結構化格式
    NoComment,
    SafeAppend,
    Other,
}

impl FileCategory {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" => FileCategory::Image,
            "js" | "ts" | "jsx" | "tsx" | "vue" | "mjs" | "cjs" | "css" => {
                FileCategory::Commentable(CommentStyle::Block)
            }
            "html" => FileCategory::Commentable(CommentStyle::Html),
            "txt" => FileCategory::Commentable(CommentStyle::Line),
            "json" | "lock" | "yml" | "yaml" | "toml" | "xml" => FileCategory::NoComment,
            "md" | "csv" | "properties" | "ini" => FileCategory::SafeAppend,
            _ => FileCategory::Other,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        FileCategory::from_extension(&extension_of(path))
    }
}

/// 依分類產生新的檔案內容，原內容保持為連續的子字串
pub fn perturb_content(category: FileCategory, content: &[u8]) -> Vec<u8> {
    match category {
        FileCategory::Commentable(style) => {
            let comment = style.render(&generate_random_string(COMMENT_RANDOM_LEN));
            let mut out = Vec::with_capacity(comment.len() + content.len());
            out.extend_from_slice(comment.as_bytes());
            out.extend_from_slice(content);
            out
        }
        _ => {
            let mut out = content.to_vec();
            if content.ends_with(b"\n") {
                out.push(b' ');
            } else {
                out.push(b'\n');
            }
            out
        }
    }
}

/// 透過外部的 exiftool 寫入圖片註解
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    /// 在 PATH 中尋找 exiftool
    pub fn detect() -> Option<Self> {
        which::which("exiftool")
            .ok()
            .map(|program| ExifTool { program })
    }

    pub fn write_comment(&self, path: &Path) -> TransformResult<()> {
        let comment = format!("Modified-{}", generate_random_string(EXIF_RANDOM_LEN));
        let output = Command::new(&self.program)
            .arg("-overwrite_original")
            .arg(format!("-Comment={}", comment))
            .arg(path)
            .output()?;
        if !output.status.success() {
            return Err(TransformError::ToolFailed {
                tool: "exiftool".to_string(),
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

pub struct FingerprintService {
    exiftool: Option<ExifTool>,
}

impl FingerprintService {
    pub fn new() -> Self {
        FingerprintService {
            exiftool: ExifTool::detect(),
        }
    }

    pub fn with_exiftool(exiftool: Option<ExifTool>) -> Self {
        FingerprintService { exiftool }
    }

    fn modify_image(&self, path: &Path) -> TransformResult<()> {
        let Some(tool) = &self.exiftool else {
            return Err(TransformError::ToolMissing("exiftool".to_string()));
        };
        tool.write_comment(path)
    }

    fn modify_text(&self, path: &Path, category: FileCategory) -> io::Result<()> {
        let content = fs::read(path)?;
        fs::write(path, perturb_content(category, &content))
    }

    fn collect_files(&self, input: &FingerprintInput, skipped_dirs: &mut usize) -> io::Result<Vec<PathBuf>> {
        let walker = WalkDir::new(&input.target)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let ignored = e.depth() > 0
                    && e.file_type().is_dir()
                    && input
                        .ignored_dirs
                        .iter()
                        .any(|name| e.file_name().to_string_lossy() == name.as_str());
                if ignored {
                    info!("跳過目錄：{}", e.path().display());
                    *skipped_dirs += 1;
                }
                !ignored
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl Default for FingerprintService {
    fn default() -> Self {
        FingerprintService::new()
    }
}

impl FingerprintServiceTrait for FingerprintService {
    fn perturb(&self, input: FingerprintInput) -> io::Result<FingerprintOutput> {
        let mut out = FingerprintOutput::default();
        let files = self.collect_files(&input, &mut out.skipped_dirs)?;
        info!("開始處理目錄：{}，共 {} 個檔案", input.target.display(), files.len());

        let pm = ProgressManager::new(files.len() as u64, input.no_progress);
        for path in &files {
            let category = FileCategory::from_path(path);
            if category == FileCategory::Image {
                match self.modify_image(path) {
                    Ok(()) => {
                        info!("已修改圖片中繼資料：{}", path.display());
                        out.images_modified += 1;
                    }
                    Err(TransformError::ToolMissing(tool)) => {
                        warn!("{} 未安裝，跳過圖片修改：{}", tool, path.display());
                    }
                    Err(e) => {
                        warn!("圖片修改失敗，跳過：{}：{}", path.display(), e);
                        out.failures += 1;
                    }
                }
            } else {
                match self.modify_text(path, category) {
                    Ok(()) => {
                        info!("已修改文字檔：{}", path.display());
                        out.text_modified += 1;
                    }
                    Err(e) => {
                        error!("修改文字檔失敗：{}：{}", path.display(), e);
                        out.failures += 1;
                    }
                }
            }
            pm.advance(path.display().to_string());
        }
        pm.finish("全部完成");
        Ok(out)
    }
}
