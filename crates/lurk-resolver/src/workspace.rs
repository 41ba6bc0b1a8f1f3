//! Workspace facade owning the resolver for one root.

use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use lurk_conf::Settings;
use lurk_conf::CONFIG_FILE_NAME;
use lurk_source::FileSystem;
use lurk_source::OsFileSystem;

use crate::WorkspaceError;
use crate::WorkspaceFileResolver;

/// One workspace root and its resolver.
///
/// Request handlers get the resolver through [`Workspace::resolver`] and share
/// it; the workspace decides when the sourcemap and configuration are
/// reloaded.
#[derive(Debug)]
pub struct Workspace {
    root: Utf8PathBuf,
    resolver: Arc<WorkspaceFileResolver>,
}

impl Workspace {
    /// Create a workspace without touching the disk. Call
    /// [`Workspace::reload_sourcemap`] to pick up a sourcemap.
    pub fn new(root: &Utf8Path, settings: Settings, disk: Arc<dyn FileSystem>) -> Self {
        let resolver = WorkspaceFileResolver::new(root, settings, disk);
        Self {
            root: resolver.root().to_path_buf(),
            resolver: Arc::new(resolver),
        }
    }

    /// Load settings for `root` from the config files and read its sourcemap
    /// if there is one.
    pub fn load(root: &Utf8Path) -> Result<Self, WorkspaceError> {
        let settings = Settings::new(root)?;
        let workspace = Self::new(root, settings, Arc::new(OsFileSystem));
        workspace.reload_sourcemap()?;
        Ok(workspace)
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    #[must_use]
    pub fn resolver(&self) -> Arc<WorkspaceFileResolver> {
        Arc::clone(&self.resolver)
    }

    /// Re-read the sourcemap file named in the settings. Returns whether a
    /// sourcemap is now loaded; a disabled or missing sourcemap clears the
    /// index.
    pub fn reload_sourcemap(&self) -> Result<bool, WorkspaceError> {
        let settings = self.resolver.settings();
        if !settings.sourcemap.enabled {
            self.resolver.clear_sourcemap();
            return Ok(false);
        }

        let path = settings.sourcemap_path(&self.root);
        let fs = self.resolver.file_system();
        if !fs.is_file(&path) {
            tracing::debug!(%path, "no sourcemap found");
            self.resolver.clear_sourcemap();
            return Ok(false);
        }

        let contents = fs
            .read_to_string(&path)
            .map_err(|source| WorkspaceError::Io {
                path: path.clone(),
                source,
            })?;
        self.resolver.update_sourcemap(&contents)?;
        Ok(true)
    }

    /// Swap in new settings, which may point at a different sourcemap.
    pub fn update_settings(&self, settings: Settings) -> Result<bool, WorkspaceError> {
        self.resolver.update_settings(settings);
        self.reload_sourcemap()
    }

    /// React to a file changing on disk.
    pub fn file_changed(&self, path: &Utf8Path) -> Result<(), WorkspaceError> {
        let path = lurk_source::normalize_path(path);
        if path.file_name() == Some(CONFIG_FILE_NAME) {
            tracing::debug!(%path, "config file changed");
            self.resolver.invalidate_configs();
        } else if path == self.resolver.settings().sourcemap_path(&self.root) {
            self.reload_sourcemap()?;
        }
        Ok(())
    }

    /// Whether `path` lies under the workspace root.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        lurk_source::normalize_path(path).starts_with(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use lurk_conf::Mode;
    use tempfile::tempdir;

    use super::*;

    const SOURCEMAP: &str = r#"{
        "name": "Game",
        "className": "DataModel",
        "children": [
            {
                "name": "Shared",
                "className": "Folder",
                "filePaths": ["src/Shared"],
                "children": [
                    { "name": "foo", "className": "ModuleScript", "filePaths": ["src/Shared/foo.lua"] }
                ]
            }
        ]
    }"#;

    fn project() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("src/Shared")).unwrap();
        fs::write(root.join("src/Shared/foo.lua"), "return {}").unwrap();
        fs::write(root.join("sourcemap.json"), SOURCEMAP).unwrap();
        (dir, root)
    }

    #[test]
    fn test_load_reads_sourcemap() {
        let (_dir, root) = project();
        let workspace = Workspace::load(&root).unwrap();
        let resolver = workspace.resolver();

        assert_eq!(
            resolver.module_name_for_path(&root.join("src/Shared/foo.lua")),
            "game/Shared/foo"
        );
    }

    #[test]
    fn test_missing_sourcemap_is_not_an_error() {
        let (_dir, root) = project();
        fs::remove_file(root.join("sourcemap.json")).unwrap();

        let workspace = Workspace::load(&root).unwrap();
        assert!(workspace.resolver().sourcemap().is_empty());
    }

    #[test]
    fn test_disabled_sourcemap() {
        let (_dir, root) = project();
        let mut settings = Settings::default();
        settings.sourcemap.enabled = false;

        let workspace = Workspace::new(&root, settings, Arc::new(OsFileSystem));
        assert!(!workspace.reload_sourcemap().unwrap());
        assert!(workspace.resolver().sourcemap().is_empty());
    }

    #[test]
    fn test_sourcemap_location_from_settings() {
        let (_dir, root) = project();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::rename(root.join("sourcemap.json"), root.join("build/map.json")).unwrap();

        let workspace = Workspace::new(&root, Settings::default(), Arc::new(OsFileSystem));
        assert!(!workspace.reload_sourcemap().unwrap());

        let mut settings = Settings::default();
        settings.sourcemap.file = Utf8PathBuf::from("build/map.json");
        assert!(workspace.update_settings(settings).unwrap());
        assert!(workspace
            .resolver()
            .sourcemap()
            .node_for_virtual_path("game/Shared/foo")
            .is_some());
    }

    #[test]
    fn test_file_changed_dispatch() {
        let (_dir, root) = project();
        let workspace = Workspace::new(&root, Settings::default(), Arc::new(OsFileSystem));
        let resolver = workspace.resolver();
        assert!(resolver.sourcemap().is_empty());

        workspace.file_changed(&root.join("sourcemap.json")).unwrap();
        assert!(!resolver.sourcemap().is_empty());

        let foo = root.join("src/Shared/foo.lua");
        assert_eq!(resolver.get_config(foo.as_str()).mode, Mode::NonStrict);
        fs::write(root.join(".luaurc"), r#"{ "languageMode": "strict" }"#).unwrap();
        assert_eq!(resolver.get_config(foo.as_str()).mode, Mode::NonStrict);

        workspace.file_changed(&root.join(".luaurc")).unwrap();
        assert_eq!(resolver.get_config(foo.as_str()).mode, Mode::Strict);
    }

    #[test]
    fn test_broken_sourcemap_is_reported() {
        let (_dir, root) = project();
        fs::write(root.join("sourcemap.json"), "{").unwrap();
        assert!(matches!(
            Workspace::load(&root),
            Err(WorkspaceError::Sourcemap(_))
        ));
    }

    #[test]
    fn test_contains() {
        let workspace = Workspace::new(
            Utf8Path::new("/proj"),
            Settings::default(),
            Arc::new(OsFileSystem),
        );
        assert!(workspace.contains(Utf8Path::new("/proj/src/a.luau")));
        assert!(workspace.contains(Utf8Path::new("/proj")));
        assert!(!workspace.contains(Utf8Path::new("/proj/../other/a.luau")));
        assert!(!workspace.contains(Utf8Path::new("/project/a.luau")));
    }
}
