//! ResourcesProvider port - live lookups against the deployed account
//!
//! Converters consult the provider for resources that are not part of the
//! build meta but already exist in the account.

/// Lookup of already-deployed resources.
///
/// Implementations:
/// - `StaticResourcesProvider` - answers from a table recorded by the deploy pipeline
/// - `NoResources` - answers nothing
pub trait ResourcesProvider {
    /// ARN of the latest deployed version of a lambda layer
    fn lambda_layer_arn(&self, layer_name: &str) -> Option<String>;
}

/// Provider that knows about no deployed resources
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourcesProvider for NoResources {
    fn lambda_layer_arn(&self, _layer_name: &str) -> Option<String> {
        None
    }
}
