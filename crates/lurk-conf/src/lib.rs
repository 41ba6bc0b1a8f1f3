mod luaurc;
mod settings;

use config::ConfigError as ExternalConfigError;
use thiserror::Error;

pub use luaurc::LintOptions;
pub use luaurc::LuauConfig;
pub use luaurc::LuauConfigFile;
pub use luaurc::Mode;
pub use luaurc::CONFIG_FILE_NAME;
pub use settings::RequireMode;
pub use settings::RequireSettings;
pub use settings::Settings;
pub use settings::SourcemapSettings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse .luaurc: {0}")]
    Luaurc(#[from] serde_json::Error),
}
