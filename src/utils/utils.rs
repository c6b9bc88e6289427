use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rand::distr::Alphanumeric;
use rand::Rng;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

pub struct ProgressManager {
    pb: ProgressBar,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len}")
                .map(|s| s.progress_chars("##-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb
        };
        ProgressManager { pb }
    }

    pub fn advance(&self, msg: String) {
        self.pb.set_message(msg);
        self.pb.inc(1);
    }

    pub fn finish(&self, msg: &'static str) {
        self.pb.finish_with_message(msg);
    }
}

pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 輸出目錄時間戳記，格式為 YYYYMMDD_HHMMSS
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// 輸出目錄名稱的基底：目錄取其名稱，檔案取不含副檔名的名稱
pub fn output_base_name(input: &Path) -> String {
    let name = if input.is_dir() {
        input.file_name()
    } else {
        input.file_stem()
    };
    name.map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}

/// 在輸入的同層建立 `<名稱>_<時間戳記>` 目錄；同一秒內重複執行時加上數字後綴
pub fn create_output_root(input: &Path, now: DateTime<Local>) -> io::Result<PathBuf> {
    let parent = input.parent().unwrap_or(input);
    let base = format!("{}_{}", output_base_name(input), format_timestamp(now));

    let mut candidate = parent.join(&base);
    let mut suffix = 1;
    while candidate.exists() {
        candidate = parent.join(format!("{}_{}", base, suffix));
        suffix += 1;
    }
    std::fs::create_dir_all(&candidate)?;
    Ok(candidate)
}
