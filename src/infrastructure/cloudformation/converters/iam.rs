//! IAM role and managed policy converters

use serde_json::Value;

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::ResourceKind;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::CloudFormationReferences;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::iam::{assume_role_policy, aws_managed_policy_arn};
use crate::infrastructure::shared::{to_logical_id, Body};

pub const MANAGED_POLICY_TYPE: &str = "AWS::IAM::ManagedPolicy";
pub const ROLE_TYPE: &str = "AWS::IAM::Role";

/// `iam_managed_policy` -> `AWS::IAM::ManagedPolicy`
pub struct IamManagedPolicyConverter;

impl CloudFormationResourceConverter for IamManagedPolicyConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let document = attrs.required_object("policy_content")?;

        let properties = Body::new()
            .with("ManagedPolicyName", name)
            .with_opt("Description", attrs.str("description")?)
            .with("PolicyDocument", Value::Object(document.clone()));

        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(MANAGED_POLICY_TYPE, properties.into_map()),
        )
    }
}

/// `iam_role` -> `AWS::IAM::Role`
pub struct IamRoleConverter;

impl CloudFormationResourceConverter for IamRoleConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let trust = assume_role_policy(&attrs)?;

        let mut policy_arns: Vec<Value> = attrs
            .str_list("predefined_policies")?
            .iter()
            .map(|p| Value::String(aws_managed_policy_arn(p)))
            .collect();
        policy_arns.extend(
            attrs
                .str_list("custom_policies")?
                .iter()
                .map(|p| CloudFormationReferences.build_reference(p, ResourceKind::IamPolicy)),
        );

        let properties = Body::new()
            .with("RoleName", name)
            .with("AssumeRolePolicyDocument", trust)
            .with_list("ManagedPolicyArns", policy_arns)
            .with_opt("PermissionsBoundary", attrs.str("permissions_boundary")?);

        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(ROLE_TYPE, properties.into_map()),
        )
    }
}
