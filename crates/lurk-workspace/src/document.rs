//! Text documents and the handle used to hand them out.

use std::ops::Deref;

use dashmap::mapref::one::Ref;
use url::Url;

use crate::language::LanguageId;

/// In-memory representation of a document's text.
///
/// Either an open document owned by the client, stored in [`Buffers`], or a
/// read-only copy of a file on disk materialised for a single lookup.
///
/// [`Buffers`]: crate::Buffers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDocument {
    uri: Url,
    /// The version number of this document (from the client)
    version: i32,
    language_id: LanguageId,
    content: String,
}

impl TextDocument {
    #[must_use]
    pub fn new(uri: Url, language_id: LanguageId, version: i32, content: String) -> Self {
        Self {
            uri,
            version,
            language_id,
            content,
        }
    }

    #[must_use]
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    #[must_use]
    pub fn language_id(&self) -> LanguageId {
        self.language_id
    }

    /// Replace the whole text. Without an explicit version from the client
    /// the version is bumped by one.
    pub fn update(&mut self, content: String, version: Option<i32>) {
        self.content = content;
        self.version = version.unwrap_or_else(|| self.version.saturating_add(1));
    }
}

/// A document that is either borrowed from the managed table or owned by
/// the caller.
///
/// `Managed` holds a read guard on one shard of the table: drop the handle
/// before mutating [`Buffers`] from the same thread. `Temporary` is a fresh
/// copy read from disk that is never stored anywhere.
///
/// [`Buffers`]: crate::Buffers
#[derive(Debug)]
pub enum DocumentRef<'a> {
    Managed(Ref<'a, String, TextDocument>),
    Temporary(TextDocument),
}

impl DocumentRef<'_> {
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// Take an owned copy, cloning only when the document is managed.
    #[must_use]
    pub fn into_owned(self) -> TextDocument {
        match self {
            Self::Managed(document) => document.value().clone(),
            Self::Temporary(document) => document,
        }
    }
}

impl Deref for DocumentRef<'_> {
    type Target = TextDocument;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Managed(document) => document.value(),
            Self::Temporary(document) => document,
        }
    }
}
