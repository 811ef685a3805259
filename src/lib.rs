//! Metaform - build meta to infrastructure template engine
//!
//! Metaform reads the build meta emitted by a serverless deploy pipeline, a
//! flat mapping of resource names to typed descriptions, and renders it as a
//! Terraform JSON configuration or a CloudFormation YAML template.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{check_coverage, render_templates, BuildMetaTransformer};
pub use config::{CliOverrides, Config, ConfigWarning};
pub use domain::entities::{BuildMeta, RenderedTemplate, ResourceMeta};
pub use domain::ports::{NoResources, ReferenceBuilder, ResourcesProvider, TemplateTransformer};
pub use domain::value_objects::{Attribute, Flavor, ResourceKind, ResourceType, TemplateSettings};
pub use error::{TransformError, TransformResult};
pub use infrastructure::{
    CloudFormationReferences, CloudFormationTransformer, StaticResourcesProvider,
    TerraformReferences, TerraformTransformer,
};
