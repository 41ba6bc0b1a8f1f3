use std::collections::BTreeMap;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use config::Config;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use serde::Serialize;

use crate::ConfigError;

/// Where relative string requires are resolved from on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequireMode {
    /// Relative to the directory of the requiring file.
    #[default]
    #[serde(alias = "relativeToFile")]
    RelativeToFile,
    /// Relative to the workspace root, whatever file requires.
    #[serde(alias = "relativeToWorkspaceRoot")]
    RelativeToWorkspaceRoot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequireSettings {
    pub mode: RequireMode,
    /// Exact require strings mapped to a file.
    pub file_aliases: BTreeMap<String, String>,
    /// Require prefixes mapped to a directory.
    pub directory_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcemapSettings {
    pub enabled: bool,
    /// Sourcemap location, relative to the workspace root.
    pub file: Utf8PathBuf,
}

impl Default for SourcemapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: Utf8PathBuf::from("sourcemap.json"),
        }
    }
}

/// Client-facing settings for one workspace.
///
/// Sources, lowest priority first: the user config file, `.lurk.toml` and
/// `lurk.toml` in the project root. Every source is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    pub require: RequireSettings,
    pub sourcemap: SourcemapSettings,
}

impl Settings {
    pub fn new(project_root: &Utf8Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("dev", "lurk", "lurk")
            .map(|proj_dirs| proj_dirs.config_dir().join("lurk.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    pub fn load_from_paths(
        project_root: &Utf8Path,
        user_config_path: Option<&std::path::Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        for name in [".lurk.toml", "lurk.toml"] {
            builder = builder.add_source(
                File::from(project_root.join(name).as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder.build()?.try_deserialize()?;
        tracing::debug!(?settings, %project_root, "loaded settings");
        Ok(settings)
    }

    /// Absolute location of the sourcemap for a workspace rooted at `root`.
    #[must_use]
    pub fn sourcemap_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        lurk_source::normalize_path(&root.join(&self.sourcemap.file))
    }
}
