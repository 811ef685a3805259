//! Lambda function converter

use serde_json::{json, Value};

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::ResourceKind;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::CloudFormationReferences;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::{to_logical_id, Body};

pub const FUNCTION_TYPE: &str = "AWS::Lambda::Function";

/// `lambda` -> `AWS::Lambda::Function`
///
/// Without a configured bundle bucket, `Code` is the local bundle path for
/// `aws cloudformation package` to upload.
pub struct LambdaFunctionConverter;

impl CloudFormationResourceConverter for LambdaFunctionConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let refs = CloudFormationReferences;

        let role = attrs
            .str_any(&["iam_role_name", "role"])?
            .ok_or_else(|| attrs.missing("iam_role_name"))?;

        let code = match attrs.str("s3_path")? {
            Some(key) => match &ctx.settings.bundle_bucket {
                Some(bucket) => Some(json!({"S3Bucket": bucket, "S3Key": key})),
                None => Some(Value::String(key.to_string())),
            },
            None => None,
        };

        let subnets = attrs.str_list("subnet_ids")?;
        let vpc_config = if subnets.is_empty() {
            None
        } else {
            Some(json!({
                "SubnetIds": subnets,
                "SecurityGroupIds": attrs.str_list("security_group_ids")?
            }))
        };

        let layers: Vec<Value> = attrs
            .str_list("layers")?
            .iter()
            .map(|layer| match ctx.resources.lambda_layer_arn(layer) {
                Some(arn) => Value::String(arn),
                None => refs.build_reference(layer, ResourceKind::LambdaLayer),
            })
            .collect();

        let properties = Body::new()
            .with("FunctionName", name)
            .with("Role", refs.build_reference(role, ResourceKind::IamRole))
            .with("Handler", attrs.required_str("func_name")?)
            .with("Runtime", attrs.required_str("runtime")?)
            .with_opt("MemorySize", attrs.int("memory")?)
            .with_opt("Timeout", attrs.int("timeout")?)
            .with_opt("Code", code)
            .with_opt(
                "Environment",
                attrs
                    .object("env_variables")?
                    .filter(|v| !v.is_empty())
                    .map(|variables| json!({"Variables": variables})),
            )
            .with_opt("VpcConfig", vpc_config)
            .with_opt(
                "TracingConfig",
                attrs.str("tracing_mode")?.map(|mode| json!({"Mode": mode})),
            )
            .with_opt(
                "ReservedConcurrentExecutions",
                attrs.int("concurrency")?,
            )
            .with_list("Layers", layers);

        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(FUNCTION_TYPE, properties.into_map()),
        )
    }
}
