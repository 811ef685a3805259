//! Provider settings attached to a template document at construction

use serde::{Deserialize, Serialize};

/// Connection settings every template flavor may embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Provider block key (Terraform)
    pub provider: String,
    /// Credentials profile
    pub profile: String,
    pub region: String,
    /// Bucket holding lambda deployment bundles
    pub bundle_bucket: Option<String>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            provider: "aws".to_string(),
            profile: "default".to_string(),
            region: "us-east-1".to_string(),
            bundle_bucket: None,
        }
    }
}
