use crate::error::{ConfigError, ConfigResult};
use crate::types::TreeFormat;
use config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub tree: TreeConfig,
    pub reader: ReaderConfig,
    pub readme: ReadmeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub format: TreeFormat,
    pub show_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub inject_line_numbers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "agentfs".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tree: TreeConfig {
                format: TreeFormat::Ascii,
                show_hidden: false,
                max_depth: None,
            },
            reader: ReaderConfig {
                inject_line_numbers: true,
                max_chars: None,
            },
            readme: ReadmeConfig {
                file_name: "README.md".to_string(),
                max_chars: None,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl Config {
    /// Loads configuration from, in increasing priority: the embedded
    /// defaults, the user config file, `explicit` (if given) and
    /// `AGENTFS_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut settings = Self::defaults_builder();

        // 1. User configuration if it exists
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("agentfs").join("config.toml");
            if user_config.exists() {
                tracing::debug!("Loading user config from {:?}", user_config);
                settings = settings.add_source(config::File::from(user_config).required(false));
            }
        }

        // 2. Explicit file must exist
        if let Some(path) = explicit {
            tracing::debug!("Loading config from {:?}", path);
            settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        // 3. Environment, e.g. AGENTFS_TREE__SHOW_HIDDEN=true
        settings = settings.add_source(
            config::Environment::with_prefix("AGENTFS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = Self::build(settings)?;
        config.validate()?;
        Ok(config)
    }

    fn defaults_builder() -> ConfigBuilder<DefaultState> {
        config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
    }

    fn build(settings: ConfigBuilder<DefaultState>) -> ConfigResult<Self> {
        settings
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.tree.max_depth == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "tree.max_depth".to_string(),
                value: "0".to_string(),
            });
        }

        if self.readme.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "readme.file_name".to_string(),
                value: self.readme.file_name.clone(),
            });
        }

        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> ConfigResult<tracing::Level> {
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
            })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
