mod path;
mod system;
mod uri;

pub use path::expand_home;
pub use path::has_script_extension;
pub use path::is_init_file;
pub use path::normalize_path;
pub use path::relative_to;
pub use system::FileSystem;
pub use system::InMemoryFileSystem;
pub use system::OsFileSystem;
pub use uri::normalize_uri;
pub use uri::path_to_url;
pub use uri::url_to_path;

/// File extensions recognised as Luau source modules, in lookup order.
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["luau", "lua"];
