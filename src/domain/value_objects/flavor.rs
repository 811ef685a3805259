//! Flavor value object - defines which template format to generate

use serde::{Deserialize, Serialize};

use super::ResourceType;

/// Target template flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    /// Terraform JSON configuration
    #[serde(alias = "tf")]
    #[value(alias = "tf")]
    Terraform,
    /// CloudFormation YAML template
    #[serde(rename = "cloudformation", alias = "cf")]
    #[value(name = "cloudformation", alias = "cf")]
    CloudFormation,
    /// All flavors (meta-flavor, expands to every concrete flavor)
    All,
}

impl Flavor {
    /// All concrete flavors (excluding `All`)
    pub const ALL_CONCRETE: [Flavor; 2] = [Flavor::Terraform, Flavor::CloudFormation];

    /// Returns true if this is the `All` meta-flavor
    pub fn is_all(&self) -> bool {
        matches!(self, Flavor::All)
    }

    /// Expand `All` to concrete flavors, or return self if already concrete
    pub fn expand(&self) -> Vec<Flavor> {
        if self.is_all() {
            Self::ALL_CONCRETE.to_vec()
        } else {
            vec![*self]
        }
    }

    /// File name the generated document is written under
    pub fn output_file_name(&self) -> &'static str {
        match self {
            Flavor::Terraform => "terraform_template.tf.json",
            Flavor::CloudFormation => "cloudformation_template.yaml",
            Flavor::All => "",
        }
    }

    /// Whether entries of `resource_type` produce output in this flavor.
    ///
    /// Unsupported types are still accepted; converting them is a no-op.
    pub fn supports(&self, resource_type: ResourceType) -> bool {
        match self {
            Flavor::Terraform => true,
            Flavor::CloudFormation => !matches!(
                resource_type,
                ResourceType::CloudWatchAlarm | ResourceType::DynamoDbStream
            ),
            Flavor::All => Self::ALL_CONCRETE.iter().all(|f| f.supports(resource_type)),
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Flavor::Terraform => "Terraform",
            Flavor::CloudFormation => "CloudFormation",
            Flavor::All => "All",
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
