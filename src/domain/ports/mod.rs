//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod reference_builder;
pub mod resources_provider;
pub mod template_transformer;

pub use reference_builder::ReferenceBuilder;
pub use resources_provider::{NoResources, ResourcesProvider};
pub use template_transformer::TemplateTransformer;
