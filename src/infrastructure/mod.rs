//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//!
//! ## Structure
//!
//! - `terraform/` - Terraform JSON transformer, references and converters
//! - `cloudformation/` - CloudFormation YAML transformer, references and converters
//! - `shared/` - attribute models and document helpers used by both flavors
//! - `resources` - resources provider backed by recorded ARNs
//! - `output` - atomic template writer

pub mod cloudformation;
pub mod output;
pub mod resources;
pub mod shared;
pub mod terraform;

pub use cloudformation::{CloudFormationReferences, CloudFormationTransformer};
pub use output::{write_atomic, write_templates, WrittenTemplate};
pub use resources::StaticResourcesProvider;
pub use terraform::{TerraformReferences, TerraformTransformer};

use crate::domain::ports::{ResourcesProvider, TemplateTransformer};
use crate::domain::value_objects::{Flavor, TemplateSettings};

/// Fresh transformer for a concrete flavor; `None` for [`Flavor::All`]
pub fn transformer_for<'a>(
    flavor: Flavor,
    settings: &'a TemplateSettings,
    resources: &'a dyn ResourcesProvider,
) -> Option<Box<dyn TemplateTransformer + 'a>> {
    match flavor {
        Flavor::Terraform => Some(Box::new(TerraformTransformer::new(settings, resources))),
        Flavor::CloudFormation => Some(Box::new(CloudFormationTransformer::new(
            settings, resources,
        ))),
        Flavor::All => None,
    }
}
