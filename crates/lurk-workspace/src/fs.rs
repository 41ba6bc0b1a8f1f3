use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use lurk_source::FileSystem;

use crate::buffers::Buffers;

/// File system that serves open documents from their buffers.
///
/// Reads check [`Buffers`] first and fall back to `disk`, so an unsaved edit
/// is what resolution sees.
#[derive(Clone)]
pub struct WorkspaceFileSystem {
    buffers: Buffers,
    disk: Arc<dyn FileSystem>,
}

impl WorkspaceFileSystem {
    #[must_use]
    pub fn new(buffers: Buffers, disk: Arc<dyn FileSystem>) -> Self {
        Self { buffers, disk }
    }

    #[must_use]
    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    /// The file system underneath the buffers.
    #[must_use]
    pub fn disk(&self) -> &Arc<dyn FileSystem> {
        &self.disk
    }

    fn is_buffered(&self, path: &Utf8Path) -> bool {
        lurk_source::path_to_url(path).is_some_and(|url| self.buffers.contains(&url))
    }
}

impl std::fmt::Debug for WorkspaceFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceFileSystem")
            .field("buffers", &self.buffers.len())
            .finish_non_exhaustive()
    }
}

impl FileSystem for WorkspaceFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        if let Some(url) = lurk_source::path_to_url(path) {
            if let Some(document) = self.buffers.get(&url) {
                return Ok(document.content().to_string());
            }
        }
        self.disk.read_to_string(path)
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.is_buffered(path) || self.disk.exists(path)
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        self.is_buffered(path) || self.disk.is_file(path)
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        // buffers are never directories
        self.disk.is_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use lurk_source::InMemoryFileSystem;
    use url::Url;

    use super::*;
    use crate::language::LanguageId;

    fn overlay(disk: InMemoryFileSystem) -> WorkspaceFileSystem {
        WorkspaceFileSystem::new(Buffers::new(), Arc::new(disk))
    }

    fn open(fs: &WorkspaceFileSystem, path: &str, content: &str) {
        fs.buffers()
            .open(
                &Url::from_file_path(path).unwrap(),
                LanguageId::Luau,
                1,
                content.to_string(),
            )
            .unwrap();
    }

    #[test]
    fn test_buffer_shadows_disk() {
        let fs = overlay(InMemoryFileSystem::new().with_file("/proj/a.luau", "return 'disk'"));
        open(&fs, "/proj/a.luau", "return 'buffer'");

        assert_eq!(
            fs.read_to_string(Utf8Path::new("/proj/a.luau")).unwrap(),
            "return 'buffer'"
        );
    }

    #[test]
    fn test_falls_back_to_disk() {
        let fs = overlay(InMemoryFileSystem::new().with_file("/proj/a.luau", "return 'disk'"));
        assert_eq!(
            fs.read_to_string(Utf8Path::new("/proj/a.luau")).unwrap(),
            "return 'disk'"
        );
        assert!(fs.read_to_string(Utf8Path::new("/proj/b.luau")).is_err());
    }

    #[test]
    fn test_unsaved_buffer_is_a_file() {
        let fs = overlay(InMemoryFileSystem::new());
        open(&fs, "/proj/new.luau", "return {}");

        assert!(fs.is_file(Utf8Path::new("/proj/new.luau")));
        assert!(fs.exists(Utf8Path::new("/proj/new.luau")));
        assert!(!fs.is_dir(Utf8Path::new("/proj/new.luau")));
    }

    #[test]
    fn test_closing_restores_disk_content() {
        let fs = overlay(InMemoryFileSystem::new().with_file("/proj/a.luau", "return 'disk'"));
        open(&fs, "/proj/a.luau", "return 'buffer'");
        fs.buffers()
            .close(&Url::from_file_path("/proj/a.luau").unwrap());

        assert_eq!(
            fs.read_to_string(Utf8Path::new("/proj/a.luau")).unwrap(),
            "return 'disk'"
        );
    }

    #[test]
    fn test_directories_come_from_disk() {
        let fs = overlay(InMemoryFileSystem::new().with_file("/proj/src/a.luau", ""));
        assert!(fs.is_dir(Utf8Path::new("/proj/src")));
        assert!(!fs.is_file(Utf8Path::new("/proj/src")));
    }
}
