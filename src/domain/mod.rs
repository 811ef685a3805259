//! Domain Layer
//!
//! The core of Metaform: the build-meta model and the ports every template
//! flavor implements. Nothing here touches the file system or network.
//!
//! ## Structure
//!
//! - `entities/` - Build meta and rendered templates
//! - `value_objects/` - Immutable value types (Flavor, ResourceType, ResourceKind)
//! - `ports/` - Interface definitions implemented by the infrastructure layer

pub mod entities;
pub mod ports;
pub mod value_objects;
