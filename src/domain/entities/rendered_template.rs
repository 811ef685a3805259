//! RenderedTemplate entity - a serialized template document
//!
//! RenderedTemplates are the result of transforming a build meta for one
//! flavor. They carry the file name the CLI layer writes them under.

use crate::domain::value_objects::Flavor;
use sha2::{Digest, Sha256};

/// A composed template ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    /// Flavor this document was generated for
    flavor: Flavor,
    /// Serialized document
    content: String,
    /// Cached content hash
    hash: Option<String>,
}

impl RenderedTemplate {
    /// Create a new RenderedTemplate
    pub fn new(flavor: Flavor, content: impl Into<String>) -> Self {
        Self {
            flavor,
            content: content.into(),
            hash: None,
        }
    }

    /// Get the flavor
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Get the content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the content
    pub fn into_content(self) -> String {
        self.content
    }

    /// File name for this document
    pub fn file_name(&self) -> &'static str {
        self.flavor.output_file_name()
    }

    /// Compute and cache the content hash (SHA256)
    pub fn hash(&mut self) -> &str {
        let content = &self.content;
        self.hash.get_or_insert_with(|| compute_hash(content))
    }

    /// Get hash if already computed
    pub fn cached_hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Get content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}
