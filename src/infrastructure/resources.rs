//! Resources provider backed by a recorded table

use std::collections::BTreeMap;

use crate::domain::ports::ResourcesProvider;

/// Answers lookups from ARNs recorded by the deploy pipeline, typically the
/// `[lambda_layers]` table of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticResourcesProvider {
    lambda_layers: BTreeMap<String, String>,
}

impl StaticResourcesProvider {
    pub fn new(lambda_layers: BTreeMap<String, String>) -> Self {
        Self { lambda_layers }
    }

    pub fn insert_lambda_layer(&mut self, name: impl Into<String>, arn: impl Into<String>) {
        self.lambda_layers.insert(name.into(), arn.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lambda_layers.is_empty()
    }
}

impl ResourcesProvider for StaticResourcesProvider {
    fn lambda_layer_arn(&self, layer_name: &str) -> Option<String> {
        self.lambda_layers.get(layer_name).cloned()
    }
}
