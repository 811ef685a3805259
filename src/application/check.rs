//! Coverage check for a build meta
//!
//! Reports, per flavor, which entries would produce output, which are accepted
//! but produce nothing in that flavor, and which carry an unknown tag.

use serde::Serialize;

use crate::domain::entities::BuildMeta;
use crate::domain::value_objects::Flavor;

/// How one entry fares in one flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Converted,
    NoOp,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub resource_type: String,
    pub status: CheckStatus,
}

/// Coverage of one flavor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlavorCoverage {
    pub flavor: Flavor,
    pub items: Vec<CheckItem>,
}

impl FlavorCoverage {
    pub fn count(&self, status: CheckStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }
}

/// Check every entry of `build_meta` against each concrete flavor of `flavor`
pub fn check_coverage(build_meta: &BuildMeta, flavor: Flavor) -> Vec<FlavorCoverage> {
    flavor
        .expand()
        .into_iter()
        .map(|concrete| FlavorCoverage {
            flavor: concrete,
            items: build_meta
                .iter()
                .map(|(name, resource)| CheckItem {
                    name: name.to_string(),
                    resource_type: resource.resource_type_tag().to_string(),
                    status: match resource.resource_type() {
                        None => CheckStatus::Unknown,
                        Some(rt) if concrete.supports(rt) => CheckStatus::Converted,
                        Some(_) => CheckStatus::NoOp,
                    },
                })
                .collect(),
        })
        .collect()
}
