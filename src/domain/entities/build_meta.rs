//! BuildMeta entity - the provider-agnostic description of a deployment
//!
//! A build meta is a JSON object keyed by resource name. Every entry is an
//! object carrying a `resource_type` tag plus type-specific attributes.
//! Entry order follows the source document.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::domain::entities::AttributeReader;
use crate::domain::value_objects::ResourceType;
use crate::error::{TransformError, TransformResult};

const RESOURCE_TYPE_KEY: &str = "resource_type";

/// One build meta entry
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMeta {
    resource_type: String,
    attributes: Map<String, Value>,
}

impl ResourceMeta {
    /// Create an entry from its tag and attribute object
    pub fn new(resource_type: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes,
        }
    }

    /// Build an entry from a JSON object that carries its own `resource_type`
    pub fn from_value(name: &str, value: Value) -> TransformResult<Self> {
        let Value::Object(mut attributes) = value else {
            return Err(TransformError::BuildMeta {
                message: format!("entry '{}' is not an object", name),
            });
        };

        let resource_type = match attributes.shift_remove(RESOURCE_TYPE_KEY) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(TransformError::BuildMeta {
                    message: format!(
                        "entry '{}' has a non-string resource_type: {}",
                        name, other
                    ),
                })
            }
            None => {
                return Err(TransformError::BuildMeta {
                    message: format!("entry '{}' has no resource_type", name),
                })
            }
        };

        Ok(Self::new(resource_type, attributes))
    }

    /// The raw `resource_type` tag
    pub fn resource_type_tag(&self) -> &str {
        &self.resource_type
    }

    /// The parsed tag, `None` when the type is not supported
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_tag(&self.resource_type)
    }

    /// All attributes except `resource_type`
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Typed attribute access that reports errors against `name`
    pub fn reader<'a>(&'a self, name: &'a str) -> AttributeReader<'a> {
        AttributeReader::new(name, &self.resource_type, &self.attributes)
    }
}

/// Ordered mapping of resource name to entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildMeta {
    entries: IndexMap<String, ResourceMeta>,
}

impl BuildMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse build meta from JSON text
    pub fn from_json(content: &str) -> TransformResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Build from an already-parsed JSON value, which must be an object
    pub fn from_value(value: Value) -> TransformResult<Self> {
        let Value::Object(map) = value else {
            return Err(TransformError::BuildMeta {
                message: "build meta must be a JSON object keyed by resource name".to_string(),
            });
        };

        let mut meta = Self::new();
        for (name, entry) in map {
            let resource = ResourceMeta::from_value(&name, entry)?;
            meta.entries.insert(name, resource);
        }
        Ok(meta)
    }

    /// Insert or replace an entry, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, resource: ResourceMeta) {
        self.entries.insert(name.into(), resource);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceMeta> {
        self.entries.get(name)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceMeta)> {
        self.entries.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
