mod index;
mod node;

use thiserror::Error;

pub use index::IndexedNode;
pub use index::NodeId;
pub use index::SourceMapIndex;
pub use node::parse_sourcemap;
pub use node::SourceCodeType;
pub use node::SourceNode;

/// Virtual root of a sourcemap whose root instance is a `DataModel`.
pub const DATA_MODEL_ROOT: &str = "game";
/// Virtual root of any other sourcemap.
pub const PROJECT_ROOT: &str = "ProjectRoot";

#[derive(Error, Debug)]
pub enum SourcemapError {
    #[error("Failed to parse sourcemap: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The name points into the virtual tree (`game/...` or `ProjectRoot/...`)
/// rather than at a file on disk.
#[must_use]
pub fn is_virtual_path(name: &str) -> bool {
    [DATA_MODEL_ROOT, PROJECT_ROOT].iter().any(|root| {
        name.strip_prefix(root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_virtual_path() {
        assert!(is_virtual_path("game"));
        assert!(is_virtual_path("game/ReplicatedStorage/Shared"));
        assert!(is_virtual_path("ProjectRoot"));
        assert!(is_virtual_path("ProjectRoot/src"));
        assert!(!is_virtual_path("gameplay/foo"));
        assert!(!is_virtual_path("/proj/src/game/foo.luau"));
        assert!(!is_virtual_path("ProjectRootish"));
    }
}
