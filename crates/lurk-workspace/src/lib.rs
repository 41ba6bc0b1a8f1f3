mod buffers;
mod document;
mod fs;
mod language;

pub use buffers::BufferError;
pub use buffers::Buffers;
pub use document::DocumentRef;
pub use document::TextDocument;
pub use fs::WorkspaceFileSystem;
pub use language::LanguageId;
