use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 外部轉換（混淆、壓縮、中繼資料寫入）失敗的原因
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("JavaScript 解析失敗（{errors} 個語法錯誤）")]
    Script { errors: usize },

    #[error("CSS 處理失敗：{0}")]
    Stylesheet(String),

    #[error("找不到外部工具：{0}")]
    ToolMissing(String),

    #[error("外部工具 {tool} 執行失敗：{path}：{message}")]
    ToolFailed {
        tool: String,
        path: PathBuf,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<TransformError> for io::Error {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Io(e) => e,
            TransformError::ToolMissing(_) => io::Error::new(io::ErrorKind::NotFound, err.to_string()),
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

pub type TransformResult<T> = Result<T, TransformError>;
