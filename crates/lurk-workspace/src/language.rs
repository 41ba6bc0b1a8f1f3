use camino::Utf8Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageId {
    Json,
    Lua,
    Luau,
    Other,
}

impl LanguageId {
    /// Guess the language of a file that was never opened by the client.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("luau") => Self::Luau,
            Some("lua") => Self::Lua,
            Some("json") => Self::Json,
            _ => Self::Other,
        }
    }
}

impl From<&str> for LanguageId {
    fn from(language_id: &str) -> Self {
        match language_id {
            "luau" => Self::Luau,
            "lua" => Self::Lua,
            "json" | "jsonc" => Self::Json,
            _ => Self::Other,
        }
    }
}

impl From<String> for LanguageId {
    fn from(language_id: String) -> Self {
        Self::from(language_id.as_str())
    }
}
