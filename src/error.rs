//! Error types for Metaform
//!
//! Library code returns [`TransformError`]; the binary wraps it with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Metaform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Main error type for template generation
#[derive(Error, Debug)]
pub enum TransformError {
    /// A converter dereferenced an attribute the entry does not carry
    #[error("resource '{resource}' ({resource_type}) is missing required attribute '{attribute}'")]
    MissingAttribute {
        resource: String,
        resource_type: String,
        attribute: String,
    },

    /// An attribute is present but has the wrong shape
    #[error("resource '{resource}' has invalid attribute '{attribute}': {message}")]
    InvalidAttribute {
        resource: String,
        attribute: String,
        message: String,
    },

    /// Two entries map onto the same addressable name in the target document
    #[error("duplicate {label} resource '{name}' in template")]
    DuplicateResource { label: String, name: String },

    /// The build meta itself is not shaped as expected
    #[error("invalid build meta: {message}")]
    BuildMeta { message: String },

    /// `All` or another meta flavor was passed where one document is produced
    #[error("'{0}' is not a concrete template flavor")]
    ConcreteFlavorRequired(String),

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl TransformError {
    pub(crate) fn missing(resource: &str, resource_type: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            resource: resource.to_string(),
            resource_type: resource_type.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn invalid(resource: &str, attribute: &str, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            resource: resource.to_string(),
            attribute: attribute.to_string(),
            message: message.into(),
        }
    }
}
