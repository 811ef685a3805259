//! Domain Entities
//!
//! - `BuildMeta` - The per-deployment resource description
//! - `AttributeReader` - Typed access to one entry's attributes
//! - `RenderedTemplate` - A composed template document

mod attributes;
mod build_meta;
mod rendered_template;

pub use attributes::{coerce_int, is_truthy, AttributeReader};
pub use build_meta::{BuildMeta, ResourceMeta};
pub use rendered_template::RenderedTemplate;
