//! The `.luaurc` cascade.
//!
//! A module's configuration is every `.luaurc` from the workspace root down
//! to the module's directory, applied in order on top of the default.
//! Results are memoized per directory and thrown away together whenever a
//! config file or the sourcemap may have changed.

use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use lurk_conf::LuauConfig;
use lurk_conf::LuauConfigFile;
use lurk_conf::CONFIG_FILE_NAME;
use lurk_source::FileSystem;

use crate::WorkspaceFileResolver;

impl WorkspaceFileResolver {
    /// Effective configuration for a module. Falls back to the default when
    /// the module has no directory on disk.
    #[must_use]
    pub fn get_config(&self, name: &str) -> Arc<LuauConfig> {
        match self.config_directory(name) {
            Some(directory) => self.cascade_from(&directory),
            None => Arc::clone(&self.default_config),
        }
    }

    fn config_directory(&self, name: &str) -> Option<Utf8PathBuf> {
        let path = self.context_real_path(name)?;
        if self.file_system().is_dir(&path) {
            Some(path)
        } else {
            path.parent().map(Utf8Path::to_path_buf)
        }
    }

    /// Configuration for `directory`, built from the nearest cached ancestor
    /// down. The walk stops at the workspace root or the file system root.
    #[must_use]
    pub fn cascade_from(&self, directory: &Utf8Path) -> Arc<LuauConfig> {
        let generation = *self.config_generation.read();
        self.cascade_at(directory, generation)
    }

    fn cascade_at(&self, directory: &Utf8Path, generation: u64) -> Arc<LuauConfig> {
        if let Some(config) = self.config_cache.get(directory) {
            return Arc::clone(config.value());
        }

        let parent = if directory == self.root() {
            None
        } else {
            directory.parent()
        };
        let inherited = match parent {
            Some(parent) => self.cascade_at(parent, generation),
            None => Arc::clone(&self.default_config),
        };

        let config = match self.read_config_file(directory) {
            Some(file) => {
                let mut config = LuauConfig::clone(&inherited);
                config.apply(file, directory);
                Arc::new(config)
            }
            None => inherited,
        };

        // Held across the insert so an invalidation cannot slip in between
        // the check and the write.
        let current = self.config_generation.read();
        if *current == generation {
            self.config_cache
                .insert(directory.to_path_buf(), Arc::clone(&config));
        } else {
            tracing::debug!(%directory, "config invalidated during lookup, not caching");
        }
        config
    }

    /// Forget every cached configuration, including lookups still in flight.
    pub fn invalidate_configs(&self) {
        let mut generation = self.config_generation.write();
        *generation = generation.wrapping_add(1);
        self.config_cache.clear();
    }

    fn read_config_file(&self, directory: &Utf8Path) -> Option<LuauConfigFile> {
        let path = directory.join(CONFIG_FILE_NAME);
        let fs = self.file_system();
        if !fs.is_file(&path) {
            return None;
        }

        let contents = match fs.read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(%path, "failed to read config file: {err}");
                return None;
            }
        };

        match LuauConfigFile::parse(&contents) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!(%path, "ignoring malformed config file: {err}");
                None
            }
        }
    }
}
