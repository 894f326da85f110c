//! # Form Records
//!
//! Descriptive metadata for the plant's forms (molds): a name, free-text
//! description, and the documents attached to it. Documents are either
//! uploaded files, recorded by name and size, or links to an external URL.
//! File contents are never stored here.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "48in Manhole Base",
//!   "description": "Steel form, 6in wall",
//!   "documents": [
//!     { "title": "Shop drawing", "source": { "kind": "Upload", "file_name": "mh48.pdf", "size_bytes": 183422 } },
//!     { "title": "Vendor page", "source": { "kind": "Link", "url": "https://example.com/forms/mh48" } }
//!   ],
//!   "created": "2025-01-06T15:04:05Z",
//!   "modified": "2025-01-06T15:04:05Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Where an attached document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DocumentSource {
    /// A file the user uploaded
    Upload { file_name: String, size_bytes: u64 },
    /// An external link
    Link { url: String },
}

/// A document attached to a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub title: String,
    pub source: DocumentSource,
}

impl DocumentRef {
    pub fn upload(title: impl Into<String>, file_name: impl Into<String>, size_bytes: u64) -> Self {
        DocumentRef {
            title: title.into(),
            source: DocumentSource::Upload {
                file_name: file_name.into(),
                size_bytes,
            },
        }
    }

    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        DocumentRef {
            title: title.into(),
            source: DocumentSource::Link { url: url.into() },
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.title.trim().is_empty() {
            return Err(CalcError::missing_field("title"));
        }
        match &self.source {
            DocumentSource::Upload { file_name, .. } => {
                if file_name.trim().is_empty() {
                    return Err(CalcError::missing_field("file_name"));
                }
            }
            DocumentSource::Link { url } => {
                let url = url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(CalcError::invalid_input(
                        "url",
                        url,
                        "Link must start with http:// or https://",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Metadata record for one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FormRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        FormRecord {
            name: name.into(),
            description: description.into(),
            documents: Vec::new(),
            created: now,
            modified: now,
        }
    }

    /// Validate the record and every attached document.
    pub fn validate(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::missing_field("name"));
        }
        self.documents.iter().try_for_each(DocumentRef::validate)
    }

    /// Attach a document after validating it.
    pub fn attach_document(&mut self, document: DocumentRef) -> CalcResult<()> {
        document.validate()?;
        self.documents.push(document);
        self.modified = Utc::now();
        Ok(())
    }

    /// Remove the document at `index`, returning it.
    pub fn detach_document(&mut self, index: usize) -> CalcResult<DocumentRef> {
        if index >= self.documents.len() {
            return Err(CalcError::invalid_input(
                "document_index",
                index.to_string(),
                format!("Form has {} documents", self.documents.len()),
            ));
        }
        self.modified = Utc::now();
        Ok(self.documents.remove(index))
    }

    /// Links only
    pub fn links(&self) -> impl Iterator<Item = &DocumentRef> {
        self.documents
            .iter()
            .filter(|d| matches!(d.source, DocumentSource::Link { .. }))
    }
}
