use std::io;
use std::path::PathBuf;

use clap::Parser;

use crate::config::config::{validate_input_path, Cli};
use crate::config::ports::{AppConfig, ConfigPort, PipelinePort};
use crate::facade::pipeline_facade::PipelineFacade;
use crate::models::path_map::StructureMode;
use crate::models::pipeline::PipelineOutput;
use crate::service::config_service::ConfigService;
use crate::utils::utils::setup_logging;

pub fn process_cli_mode() -> io::Result<PipelineOutput> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;
    run_with_cli(cli)
}

pub fn run_with_cli(cli: Cli) -> io::Result<PipelineOutput> {
    let config_port: Box<dyn ConfigPort> = Box::new(CliConfigAdapter::new(cli));
    let config_service = ConfigService::new(config_port);
    let config = config_service.get_config()?;

    let pipeline: Box<dyn PipelinePort> = Box::new(PipelineFacade::default());
    pipeline.execute(config)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let input: PathBuf = validate_input_path(self.cli.input.as_deref())?.to_path_buf();
        let structure = StructureMode::from_keep_structure(self.cli.keep_structure);
        if structure == StructureMode::Flatten {
            log::warn!("攤平模式：不同目錄中同名的檔案會互相覆蓋");
        }
        Ok(AppConfig {
            input,
            structure,
            minify_css: self.cli.minify_css,
            no_progress: self.cli.no_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_adapter_maps_flags() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "html_obfuscator",
            input.as_str(),
            "--keep-structure=false",
            "--minify-css=false",
            "--no-progress",
        ]);
        let config = CliConfigAdapter::new(cli).get_config().unwrap();
        assert_eq!(config.structure, StructureMode::Flatten);
        assert!(!config.minify_css);
        assert!(config.no_progress);
    }

    #[test]
    fn defaults_preserve_structure_and_minify() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["html_obfuscator", input.as_str()]);
        let config = CliConfigAdapter::new(cli).get_config().unwrap();
        assert_eq!(config.structure, StructureMode::Preserve);
        assert!(config.minify_css);
        assert!(!config.no_progress);
    }

    #[test]
    fn invalid_input_fails_before_any_output() {
        let cli = Cli::parse_from(["html_obfuscator", "/no/such/site"]);
        let err = run_with_cli(cli).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
