//! Shared storage for documents the client has open.
//!
//! While a document is open its buffer is authoritative over whatever is on
//! disk. [`Buffers`] is shared between the resolver, which reads through it,
//! and the event handlers that open, change and close documents.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use thiserror::Error;
use url::Url;

use crate::document::TextDocument;
use crate::language::LanguageId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BufferError {
    #[error("document is already open: {0}")]
    AlreadyOpen(String),
    #[error("document is not open: {0}")]
    NotOpen(String),
}

/// Open documents keyed by normalized uri.
#[derive(Clone, Debug, Default)]
pub struct Buffers {
    inner: Arc<DashMap<String, TextDocument>>,
}

impl Buffers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &self,
        uri: &Url,
        language_id: LanguageId,
        version: i32,
        content: String,
    ) -> Result<(), BufferError> {
        let key = lurk_source::normalize_uri(uri);
        match self.inner.entry(key) {
            Entry::Occupied(entry) => Err(BufferError::AlreadyOpen(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(TextDocument::new(uri.clone(), language_id, version, content));
                Ok(())
            }
        }
    }

    /// Replace the content of an open document.
    pub fn change(
        &self,
        uri: &Url,
        content: String,
        version: Option<i32>,
    ) -> Result<(), BufferError> {
        let key = lurk_source::normalize_uri(uri);
        let mut document = self
            .inner
            .get_mut(&key)
            .ok_or(BufferError::NotOpen(key.clone()))?;
        document.update(content, version);
        Ok(())
    }

    /// Close a document and return it if it was open.
    pub fn close(&self, uri: &Url) -> Option<TextDocument> {
        self.inner
            .remove(&lurk_source::normalize_uri(uri))
            .map(|(_, document)| document)
    }

    #[must_use]
    pub fn get(&self, uri: &Url) -> Option<Ref<'_, String, TextDocument>> {
        self.inner.get(&lurk_source::normalize_uri(uri))
    }

    #[must_use]
    pub fn contains(&self, uri: &Url) -> bool {
        self.inner.contains_key(&lurk_source::normalize_uri(uri))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
