use std::io;
use std::path::PathBuf;

use clap::Parser;

use crate::config::config::{validate_target_dir, FingerprintCli};
use crate::config::ports::{FingerprintConfig, DEFAULT_IGNORED_DIRS};
use crate::models::fingerprint::{FingerprintInput, FingerprintOutput};
use crate::service::fingerprint::FingerprintService;
use crate::service::traits::i_service::FingerprintServiceTrait;
use crate::utils::utils::setup_logging;

pub fn process_fingerprint_mode() -> io::Result<FingerprintOutput> {
    let cli = FingerprintCli::parse();
    setup_logging(&cli.log_level)?;
    let config = fingerprint_config(&cli)?;
    run_fingerprint(config, &FingerprintService::new())
}

pub fn fingerprint_config(cli: &FingerprintCli) -> io::Result<FingerprintConfig> {
    let target = match cli.target.as_deref() {
        Some(t) => PathBuf::from(t),
        None => std::env::current_dir()?,
    };
    validate_target_dir(&target)?;

    let ignored_dirs = if cli.no_ignore {
        Vec::new()
    } else {
        DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect()
    };
    Ok(FingerprintConfig {
        target,
        ignored_dirs,
        no_progress: cli.no_progress,
    })
}

pub fn run_fingerprint(config: FingerprintConfig, service: &dyn FingerprintServiceTrait) -> io::Result<FingerprintOutput> {
    log::info!("開始處理目錄：{}", config.target.display());
    let output = service.perturb(FingerprintInput {
        target: config.target,
        ignored_dirs: config.ignored_dirs,
        no_progress: config.no_progress,
    })?;
    log::info!(
        "全部完成：文字檔 {} 個，圖片 {} 個，跳過目錄 {} 個，失敗 {} 個",
        output.text_modified, output.images_modified, output.skipped_dirs, output.failures
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_is_rejected() {
        let cli = FingerprintCli::parse_from(["fingerprint", "/no/such/dir"]);
        let err = fingerprint_config(&cli).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn ignore_list_can_be_disabled() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().to_string_lossy().to_string();

        let cli = FingerprintCli::parse_from(["fingerprint", target.as_str()]);
        let config = fingerprint_config(&cli).unwrap();
        assert!(config.ignored_dirs.iter().any(|d| d == "node_modules"));

        let cli = FingerprintCli::parse_from(["fingerprint", target.as_str(), "--no-ignore"]);
        let config = fingerprint_config(&cli).unwrap();
        assert!(config.ignored_dirs.is_empty());
    }
}
