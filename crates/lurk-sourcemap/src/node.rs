use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;

use crate::SourcemapError;

/// How the runtime would execute a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceCodeType {
    Module,
    Script,
    Local,
}

impl SourceCodeType {
    /// Classify by instance class, `None` for instances that carry no code.
    #[must_use]
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        match class_name {
            "ModuleScript" => Some(Self::Module),
            "Script" => Some(Self::Script),
            "LocalScript" => Some(Self::Local),
            _ => None,
        }
    }

    /// Classify a file outside the sourcemap by its `.server` / `.client`
    /// suffix.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.file_stem().and_then(|stem| stem.rsplit_once('.')) {
            Some((_, "server")) => Self::Script,
            Some((_, "client")) => Self::Local,
            _ => Self::Module,
        }
    }
}

/// One instance of a Rojo-style sourcemap.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub name: String,
    pub class_name: String,
    /// Paths relative to the project root.
    #[serde(default)]
    pub file_paths: Vec<Utf8PathBuf>,
    #[serde(default)]
    pub children: Vec<SourceNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_metadata: Option<serde_json::Value>,
}

impl SourceNode {
    #[must_use]
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            file_paths: Vec::new(),
            children: Vec::new(),
            plugin_metadata: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    /// The file holding this instance's code.
    ///
    /// `.json` files count only for module scripts, where they become data
    /// modules.
    #[must_use]
    pub fn script_file_path(&self) -> Option<&Utf8Path> {
        self.file_paths
            .iter()
            .map(Utf8PathBuf::as_path)
            .find(|path| {
                lurk_source::has_script_extension(path)
                    || (self.class_name == "ModuleScript" && path.extension() == Some("json"))
            })
    }

    /// The path the node claims on disk: its script file, else the first
    /// listed path.
    #[must_use]
    pub fn backing_path(&self) -> Option<&Utf8Path> {
        self.script_file_path()
            .or_else(|| self.file_paths.first().map(Utf8PathBuf::as_path))
    }

    #[must_use]
    pub fn source_code_type(&self) -> Option<SourceCodeType> {
        SourceCodeType::from_class_name(&self.class_name)
    }

    /// Virtual root name for a tree with this node at the top.
    #[must_use]
    pub fn root_name(&self) -> &'static str {
        if self.class_name == "DataModel" {
            crate::DATA_MODEL_ROOT
        } else {
            crate::PROJECT_ROOT
        }
    }

    /// Number of nodes in this subtree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SourceNode::node_count).sum::<usize>()
    }
}

pub fn parse_sourcemap(contents: &str) -> Result<SourceNode, SourcemapError> {
    Ok(serde_json::from_str(contents)?)
}
