use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// 取得小寫的副檔名（不含點）
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn is_html_file(path: &Path) -> bool {
    matches!(extension_of(path).as_str(), "html" | "htm")
}

fn is_excluded(entry: &DirEntry, exclude: Option<&Path>) -> bool {
    exclude.is_some_and(|ex| entry.path() == ex)
}

/// 遞迴列出目錄下所有檔案，依檔名排序；`exclude` 指定的子樹不會被走訪
pub fn walk_files(root: &Path, exclude: Option<&Path>) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclude));
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// 只列出 .html / .htm（不分大小寫）
pub fn walk_html_files(root: &Path, exclude: Option<&Path>) -> io::Result<Vec<PathBuf>> {
    Ok(walk_files(root, exclude)?
        .into_iter()
        .filter(|p| is_html_file(p))
        .collect())
}

/// 輸入為目錄時遞迴搜尋 HTML，為 HTML 檔案時只處理該檔案
pub fn html_files_or_single(input: &Path, exclude: Option<&Path>) -> io::Result<Vec<PathBuf>> {
    if input.is_dir() {
        walk_html_files(input, exclude)
    } else if input.is_file() && is_html_file(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        warn!("輸入不是 HTML 檔案，僅複製資源：{}", input.display());
        Ok(Vec::new())
    }
}

/// 將 `from` 下所有檔案依原結構複製到 `to`，作為之後覆寫的基準
pub fn copy_all_assets(from: &Path, to: &Path, exclude: Option<&Path>) -> io::Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    for file in walk_files(from, exclude)? {
        let Ok(rel) = file.strip_prefix(from) else {
            continue;
        };
        let target = to.join(rel);
        match copy_file(&file, &target) {
            Ok(()) => {
                debug!("複製：{}", rel.display());
                copied += 1;
            }
            Err(e) => warn!("複製 {} 失敗: {}", file.display(), e),
        }
    }
    Ok(copied)
}

/// 複製單一檔案，必要時先建立上層目錄
pub fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

/// 寫入檔案，必要時先建立上層目錄
pub fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
