//! Bidirectional lookup between the virtual tree and real paths.
//!
//! [`SourceMapIndex`] flattens a [`SourceNode`] tree into an arena so nodes
//! can point at their parent. An index is immutable once built; replacing the
//! sourcemap means building a new index and swapping it in whole.

use camino::Utf8Path;
use camino::Utf8PathBuf;
use rustc_hash::FxHashMap;

use crate::SourceCodeType;
use crate::SourceNode;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct IndexedNode {
    id: NodeId,
    name: String,
    class_name: String,
    virtual_path: String,
    real_path: Option<Utf8PathBuf>,
    directory_like: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    plugin_metadata: Option<serde_json::Value>,
}

impl IndexedNode {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// Absolute path backing this node, `None` for virtual-only nodes such
    /// as folders that exist purely for organisation.
    #[must_use]
    pub fn real_path(&self) -> Option<&Utf8Path> {
        self.real_path.as_deref()
    }

    #[must_use]
    pub fn source_code_type(&self) -> Option<SourceCodeType> {
        SourceCodeType::from_class_name(&self.class_name)
    }

    /// Relative requires from this node resolve against the node itself
    /// rather than its parent: it has no script, or its script is an `init`
    /// file standing in for a directory.
    #[must_use]
    pub fn is_directory_like(&self) -> bool {
        self.directory_like
    }

    #[must_use]
    pub fn plugin_metadata(&self) -> Option<&serde_json::Value> {
        self.plugin_metadata.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SourceMapIndex {
    root_dir: Utf8PathBuf,
    nodes: Vec<IndexedNode>,
    by_virtual_path: FxHashMap<String, NodeId>,
    by_real_path: FxHashMap<Utf8PathBuf, NodeId>,
}

impl SourceMapIndex {
    /// Index the tree under `root`, resolving node file paths against
    /// `root_dir`.
    ///
    /// Nodes are visited depth first, parents before children and children
    /// in declared order. When two nodes claim the same real path the one
    /// visited last keeps it.
    #[must_use]
    pub fn build(root_dir: &Utf8Path, root: &SourceNode) -> Self {
        let mut index = Self {
            root_dir: root_dir.to_path_buf(),
            nodes: Vec::with_capacity(root.node_count()),
            by_virtual_path: FxHashMap::default(),
            by_real_path: FxHashMap::default(),
        };
        index.insert(root, None, root.root_name().to_string());
        index
    }

    fn insert(&mut self, node: &SourceNode, parent: Option<NodeId>, virtual_path: String) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let real_path = node
            .backing_path()
            .map(|path| lurk_source::normalize_path(&self.root_dir.join(path)));

        if let Some(real_path) = &real_path {
            if let Some(previous) = self.by_real_path.insert(real_path.clone(), id) {
                tracing::debug!(
                    %real_path,
                    previous = %self.nodes[previous.index()].virtual_path,
                    current = %virtual_path,
                    "real path claimed by more than one sourcemap node, keeping the last"
                );
            }
        }
        if let Some(previous) = self.by_virtual_path.insert(virtual_path.clone(), id) {
            tracing::debug!(%virtual_path, ?previous, "duplicate virtual path in sourcemap");
        }

        self.nodes.push(IndexedNode {
            id,
            name: node.name.clone(),
            class_name: node.class_name.clone(),
            virtual_path: virtual_path.clone(),
            real_path,
            directory_like: node
                .script_file_path()
                .map_or(true, lurk_source::is_init_file),
            parent,
            children: Vec::with_capacity(node.children.len()),
            plugin_metadata: node.plugin_metadata.clone(),
        });

        for child in &node.children {
            let child_id = self.insert(child, Some(id), format!("{virtual_path}/{}", child.name));
            self.nodes[id.index()].children.push(child_id);
        }

        id
    }

    #[must_use]
    pub fn root_dir(&self) -> &Utf8Path {
        &self.root_dir
    }

    #[must_use]
    pub fn root(&self) -> Option<&IndexedNode> {
        self.nodes.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&IndexedNode> {
        self.nodes.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedNode> + '_ {
        self.nodes.iter()
    }

    #[must_use]
    pub fn node_for_virtual_path(&self, virtual_path: &str) -> Option<&IndexedNode> {
        let id = self.by_virtual_path.get(virtual_path)?;
        self.get(*id)
    }

    /// Look up the node backed by `real_path`, which may be spelled with
    /// `.` or `..` segments.
    #[must_use]
    pub fn node_for_real_path(&self, real_path: &Utf8Path) -> Option<&IndexedNode> {
        let id = self
            .by_real_path
            .get(real_path)
            .or_else(|| self.by_real_path.get(&lurk_source::normalize_path(real_path)))?;
        self.get(*id)
    }

    #[must_use]
    pub fn real_path_for_node(&self, id: NodeId) -> Option<&Utf8Path> {
        self.get(id)?.real_path()
    }

    #[must_use]
    pub fn virtual_path_for_node(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(IndexedNode::virtual_path)
    }

    #[must_use]
    pub fn parent(&self, node: &IndexedNode) -> Option<&IndexedNode> {
        self.get(node.parent?)
    }

    pub fn children<'a>(&'a self, node: &'a IndexedNode) -> impl Iterator<Item = &'a IndexedNode> + 'a {
        node.children.iter().filter_map(|id| self.get(*id))
    }

    /// Walk from `node` (inclusive) towards the root and return the first
    /// node that has a real path.
    #[must_use]
    pub fn nearest_real_ancestor<'a>(&'a self, node: &'a IndexedNode) -> Option<&'a IndexedNode> {
        std::iter::successors(Some(node), |current| self.parent(current))
            .find(|current| current.real_path.is_some())
    }

    /// The closest strict ancestor of `node` called `name`.
    #[must_use]
    pub fn ancestor_named<'a>(&'a self, node: &'a IndexedNode, name: &str) -> Option<&'a IndexedNode> {
        std::iter::successors(self.parent(node), |current| self.parent(current))
            .find(|current| current.name == name)
    }
}
