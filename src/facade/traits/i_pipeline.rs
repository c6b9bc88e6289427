use std::io;

use crate::config::ports::AppConfig;
use crate::models::pipeline::PipelineOutput;

// Facade 接口，負責協調整個混淆流程
pub trait PipelineFacadeTrait: Send + Sync {
    /// 執行一次完整的處理流程
    /// # 參數
    /// - config: 輸入路徑、目錄結構模式與 CSS 壓縮開關
    /// # 回傳
    /// - 成功時返回輸出目錄與處理統計；輸入路徑無效時返回 IO 錯誤
    fn run(&self, config: AppConfig) -> io::Result<PipelineOutput>;
}
