//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod flavor;
mod resource_kind;
mod resource_type;
mod template_settings;

pub use flavor::Flavor;
pub use resource_kind::{Attribute, ResourceKind};
pub use resource_type::ResourceType;
pub use template_settings::TemplateSettings;
