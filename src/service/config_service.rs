use std::io;

use crate::config::ports::{AppConfig, ConfigPort};

// 配置服務，負責從選定的配置適配器取得配置
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::models::path_map::StructureMode;

    struct FixedConfig;

    impl ConfigPort for FixedConfig {
        fn get_config(&self) -> io::Result<AppConfig> {
            Ok(AppConfig {
                input: PathBuf::from("site"),
                structure: StructureMode::Flatten,
                minify_css: false,
                no_progress: true,
            })
        }
    }

    #[test]
    fn service_returns_adapter_config() {
        let config = ConfigService::new(Box::new(FixedConfig)).get_config().unwrap();
        assert_eq!(config.input, PathBuf::from("site"));
        assert_eq!(config.structure, StructureMode::Flatten);
        assert!(!config.minify_css);
    }
}
