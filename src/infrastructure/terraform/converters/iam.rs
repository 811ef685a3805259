//! IAM role and managed policy converters

use serde_json::Value;

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::iam::{assume_role_policy, aws_managed_policy_arn, policy_string};
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::references::build_policy_arn_ref;
use crate::infrastructure::terraform::template::TfResourceType;

/// `iam_managed_policy` -> `aws_iam_policy`
pub struct IamManagedPolicyConverter;

impl TerraformResourceConverter for IamManagedPolicyConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let document = attrs.required_object("policy_content")?;

        let body = Body::new()
            .with("name", name)
            .with_opt("description", attrs.str("description")?)
            .with(
                "policy",
                policy_string(&Value::Object(document.clone()))?,
            );

        ctx.template
            .add(TfResourceType::IamPolicy, name, body.into_map())?;
        Ok(())
    }
}

/// `iam_role` -> `aws_iam_role`
pub struct IamRoleConverter;

impl TerraformResourceConverter for IamRoleConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let trust = assume_role_policy(&attrs)?;

        let mut policy_arns: Vec<String> = attrs
            .str_list("predefined_policies")?
            .iter()
            .map(|p| aws_managed_policy_arn(p))
            .collect();
        policy_arns.extend(
            attrs
                .str_list("custom_policies")?
                .iter()
                .map(|p| build_policy_arn_ref(p)),
        );

        let body = Body::new()
            .with("name", name)
            .with("assume_role_policy", policy_string(&trust)?)
            .with_list("managed_policy_arns", policy_arns)
            .with_opt("permissions_boundary", attrs.str("permissions_boundary")?);

        ctx.template.add(TfResourceType::IamRole, name, body.into_map())?;
        Ok(())
    }
}
