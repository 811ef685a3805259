//! ReferenceBuilder port - how one resource body addresses another
//!
//! Construction is purely syntactic: builders never check that the referenced
//! resource exists anywhere in the document.

use serde_json::Value;

use crate::domain::value_objects::{Attribute, ResourceKind};

/// Builds flavor-specific reference expressions.
///
/// Implementations:
/// - `TerraformReferences` - `${label.name.attribute}` interpolation strings
/// - `CloudFormationReferences` - `Ref` / `Fn::GetAtt` / `Fn::Sub` intrinsics
pub trait ReferenceBuilder {
    /// Reference to `attribute` of the resource `name` of kind `kind`
    fn attribute_reference(&self, name: &str, kind: ResourceKind, attribute: Attribute) -> Value;

    /// ARN reference, the common case
    fn build_reference(&self, name: &str, kind: ResourceKind) -> Value {
        self.attribute_reference(name, kind, Attribute::Arn)
    }
}
