//! Module resolution for a Luau workspace.
//!
//! A module name is either a path into the sourcemap's virtual tree
//! (`game/ReplicatedStorage/Shared`) or an absolute path on disk. The
//! [`WorkspaceFileResolver`] reconciles the two namespaces with the documents
//! the client has open, and answers the two questions a type checker asks
//! about a module: what its source is and what configuration applies to it.

mod config;
mod require;
mod resolver;
mod source;
mod workspace;

use std::sync::Arc;

use camino::Utf8PathBuf;
use lurk_conf::ConfigError;
use lurk_conf::LuauConfig;
use lurk_sourcemap::SourceCodeType;
use lurk_sourcemap::SourcemapError;
use lurk_workspace::BufferError;
use thiserror::Error;

pub use require::resolve_directory_alias;
pub use require::RequireExpr;
pub use resolver::WorkspaceFileResolver;
pub use source::json_to_luau;
pub use workspace::Workspace;

/// A module a require expression points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    /// The module may legitimately be missing at runtime, e.g. it was
    /// reached through `FindFirstChild`.
    pub optional: bool,
}

impl ModuleInfo {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
        }
    }
}

/// Source text of a module, ready for the type checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCode {
    pub source: String,
    pub kind: SourceCodeType,
    pub display_name: String,
}

/// Source and require lookups the type checker calls back into.
pub trait FileResolver: Send + Sync {
    fn read_source(&self, name: &str) -> Option<SourceCode>;

    fn resolve_module(&self, context: Option<&ModuleInfo>, expr: &RequireExpr) -> Option<ModuleInfo>;

    fn human_readable_name(&self, name: &str) -> String;
}

/// Per-module analysis configuration. Never fails: modules outside any
/// configured directory get the default.
pub trait ConfigResolver: Send + Sync {
    fn get_config(&self, name: &str) -> Arc<LuauConfig>;
}

impl FileResolver for WorkspaceFileResolver {
    fn read_source(&self, name: &str) -> Option<SourceCode> {
        WorkspaceFileResolver::read_source(self, name)
    }

    fn resolve_module(&self, context: Option<&ModuleInfo>, expr: &RequireExpr) -> Option<ModuleInfo> {
        self.resolve_require(context, expr)
    }

    fn human_readable_name(&self, name: &str) -> String {
        WorkspaceFileResolver::human_readable_name(self, name)
    }
}

impl ConfigResolver for WorkspaceFileResolver {
    fn get_config(&self, name: &str) -> Arc<LuauConfig> {
        WorkspaceFileResolver::get_config(self, name)
    }
}

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sourcemap(#[from] SourcemapError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("Failed to read {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
