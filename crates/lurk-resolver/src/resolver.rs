use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use lurk_conf::LuauConfig;
use lurk_conf::RequireMode;
use lurk_conf::Settings;
use lurk_conf::CONFIG_FILE_NAME;
use lurk_source::FileSystem;
use lurk_sourcemap::is_virtual_path;
use lurk_sourcemap::SourceMapIndex;
use lurk_sourcemap::SourceNode;
use lurk_workspace::Buffers;
use lurk_workspace::DocumentRef;
use lurk_workspace::LanguageId;
use lurk_workspace::TextDocument;
use lurk_workspace::WorkspaceFileSystem;
use parking_lot::RwLock;
use url::Url;

use crate::WorkspaceError;

/// Resolves module names for one workspace root.
///
/// Holds the three pieces of state that change independently of each other:
/// the sourcemap index, the open documents and the `.luaurc` cache. Every
/// query takes `&self`; the resolver is shared as an `Arc` between editor
/// event handlers and type checker callbacks.
pub struct WorkspaceFileResolver {
    root: Utf8PathBuf,
    pub(crate) default_config: Arc<LuauConfig>,
    settings: RwLock<Arc<Settings>>,
    sourcemap: RwLock<Arc<SourceMapIndex>>,
    plugin_info: RwLock<Option<Arc<serde_json::Value>>>,
    fs: WorkspaceFileSystem,
    pub(crate) config_cache: DashMap<Utf8PathBuf, Arc<LuauConfig>>,
    /// Bumped on every invalidation. Lookups that started under an older
    /// generation return their result without caching it.
    pub(crate) config_generation: RwLock<u64>,
}

impl WorkspaceFileResolver {
    pub fn new(root: &Utf8Path, settings: Settings, disk: Arc<dyn FileSystem>) -> Self {
        Self {
            root: lurk_source::normalize_path(root),
            default_config: Arc::new(LuauConfig::default()),
            settings: RwLock::new(Arc::new(settings)),
            sourcemap: RwLock::new(Arc::new(SourceMapIndex::default())),
            plugin_info: RwLock::new(None),
            fs: WorkspaceFileSystem::new(Buffers::new(), disk),
            config_cache: DashMap::new(),
            config_generation: RwLock::new(0),
        }
    }

    /// Use `config` for modules with no `.luaurc` anywhere above them.
    #[must_use]
    pub fn with_default_config(mut self, config: LuauConfig) -> Self {
        self.default_config = Arc::new(config);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Open buffers layered over the disk.
    #[must_use]
    pub fn file_system(&self) -> &WorkspaceFileSystem {
        &self.fs
    }

    pub(crate) fn buffers(&self) -> &Buffers {
        self.fs.buffers()
    }

    #[must_use]
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings.read())
    }

    pub fn update_settings(&self, settings: Settings) {
        *self.settings.write() = Arc::new(settings);
        self.invalidate_configs();
    }

    // sourcemap

    /// Parse a Rojo sourcemap and replace the current index with it. A
    /// sourcemap that fails to parse leaves the current index in place.
    pub fn update_sourcemap(&self, contents: &str) -> Result<(), WorkspaceError> {
        let tree = lurk_sourcemap::parse_sourcemap(contents)?;
        self.set_source_tree(&tree);
        Ok(())
    }

    pub fn set_source_tree(&self, tree: &SourceNode) {
        let index = SourceMapIndex::build(&self.root, tree);
        let nodes = index.len();
        *self.sourcemap.write() = Arc::new(index);
        self.invalidate_configs();
        tracing::info!(nodes, root = %self.root, "rebuilt sourcemap index");
    }

    pub fn clear_sourcemap(&self) {
        *self.sourcemap.write() = Arc::new(SourceMapIndex::default());
        self.invalidate_configs();
    }

    /// Snapshot of the current index. Later updates swap in a new index and
    /// leave this one untouched.
    #[must_use]
    pub fn sourcemap(&self) -> Arc<SourceMapIndex> {
        Arc::clone(&self.sourcemap.read())
    }

    pub fn set_plugin_info(&self, info: serde_json::Value) {
        *self.plugin_info.write() = Some(Arc::new(info));
    }

    #[must_use]
    pub fn plugin_info(&self) -> Option<Arc<serde_json::Value>> {
        self.plugin_info.read().clone()
    }

    // documents

    pub fn open_document(&self, uri: &Url, language_id: LanguageId, version: i32, content: String) {
        if let Err(err) = self.buffers().open(uri, language_id, version, content) {
            tracing::warn!(%uri, "ignoring open: {err}");
            return;
        }
        self.invalidate_if_config(uri);
    }

    pub fn change_document(&self, uri: &Url, content: String, version: Option<i32>) {
        if let Err(err) = self.buffers().change(uri, content, version) {
            tracing::warn!(%uri, "ignoring change: {err}");
            return;
        }
        self.invalidate_if_config(uri);
    }

    pub fn close_document(&self, uri: &Url) {
        if self.buffers().close(uri).is_some() {
            self.invalidate_if_config(uri);
        } else {
            tracing::debug!(%uri, "close for a document that is not open");
        }
    }

    fn invalidate_if_config(&self, uri: &Url) {
        let is_config = lurk_source::url_to_path(uri)
            .is_some_and(|path| path.file_name() == Some(CONFIG_FILE_NAME));
        if is_config {
            self.invalidate_configs();
        }
    }

    /// The open document at `uri`, if the client has it open.
    #[must_use]
    pub fn text_document(&self, uri: &Url) -> Option<DocumentRef<'_>> {
        self.buffers().get(uri).map(DocumentRef::Managed)
    }

    /// Text of a module: its open buffer, or a temporary copy read from disk.
    /// Never adds to the open documents.
    #[must_use]
    pub fn text_document_for_module(&self, name: &str) -> Option<DocumentRef<'_>> {
        let path = self.resolve_to_real_path(name)?;
        self.text_document_for_path(&path)
    }

    pub(crate) fn text_document_for_path(&self, path: &Utf8Path) -> Option<DocumentRef<'_>> {
        let uri = lurk_source::path_to_url(path)?;
        if let Some(document) = self.buffers().get(&uri) {
            return Some(DocumentRef::Managed(document));
        }

        let content = match self.fs.disk().read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(%path, "no content for module: {err}");
                return None;
            }
        };
        Some(DocumentRef::Temporary(TextDocument::new(
            uri,
            LanguageId::from_path(path),
            0,
            content,
        )))
    }

    // module names

    #[must_use]
    pub fn module_name_for_url(&self, uri: &Url) -> String {
        match lurk_source::url_to_path(uri) {
            Some(path) => self.module_name_for_path(&path),
            None => uri.to_string(),
        }
    }

    /// Name a file: the virtual path of the sourcemap node backed by it when
    /// there is one, else its normalized absolute path.
    #[must_use]
    pub fn module_name_for_path(&self, path: &Utf8Path) -> String {
        let path = self.absolute(path);
        self.sourcemap()
            .node_for_real_path(&path)
            .map_or_else(|| path.to_string(), |node| node.virtual_path().to_string())
    }

    #[must_use]
    pub fn resolve_to_virtual_path(&self, name: &str) -> Option<String> {
        let index = self.sourcemap();
        let node = if is_virtual_path(name) {
            index.node_for_virtual_path(name)
        } else {
            index.node_for_real_path(&self.absolute(Utf8Path::new(name)))
        };
        node.map(|node| node.virtual_path().to_string())
    }

    /// The file or directory behind a module. Virtual names need a node with
    /// a real path; anything else is already a path.
    #[must_use]
    pub fn resolve_to_real_path(&self, name: &str) -> Option<Utf8PathBuf> {
        if is_virtual_path(name) {
            let index = self.sourcemap();
            let node = index.node_for_virtual_path(name)?;
            node.real_path().map(Utf8Path::to_path_buf)
        } else {
            Some(self.absolute(Utf8Path::new(name)))
        }
    }

    #[must_use]
    pub fn url_for_module(&self, name: &str) -> Option<Url> {
        lurk_source::path_to_url(&self.resolve_to_real_path(name)?)
    }

    /// Directory a relative require on disk starts from.
    #[must_use]
    pub fn require_base_path(&self, context: Option<&str>) -> Utf8PathBuf {
        if self.settings().require.mode == RequireMode::RelativeToWorkspaceRoot {
            return self.root.clone();
        }
        let Some(path) = context.and_then(|name| self.context_real_path(name)) else {
            return self.root.clone();
        };
        if self.fs.is_dir(&path) {
            return path;
        }
        path.parent()
            .map_or_else(|| self.root.clone(), Utf8Path::to_path_buf)
    }

    /// Real path standing in for a module, falling back to the nearest
    /// ancestor node with one for folders that only exist in the sourcemap.
    pub(crate) fn context_real_path(&self, name: &str) -> Option<Utf8PathBuf> {
        if !is_virtual_path(name) {
            return Some(self.absolute(Utf8Path::new(name)));
        }
        let index = self.sourcemap();
        let node = index.node_for_virtual_path(name)?;
        index
            .nearest_real_ancestor(node)?
            .real_path()
            .map(Utf8Path::to_path_buf)
    }

    pub(crate) fn absolute(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            lurk_source::normalize_path(path)
        } else {
            lurk_source::normalize_path(&self.root.join(path))
        }
    }
}

impl std::fmt::Debug for WorkspaceFileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceFileResolver")
            .field("root", &self.root)
            .field("nodes", &self.sourcemap().len())
            .field("open_documents", &self.buffers().len())
            .field("cached_configs", &self.config_cache.len())
            .finish_non_exhaustive()
    }
}
