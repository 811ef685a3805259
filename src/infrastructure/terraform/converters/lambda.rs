//! Lambda function converter

use serde_json::{json, Value};

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::ResourceKind;
use crate::error::TransformResult;
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::references::TerraformReferences;
use crate::infrastructure::terraform::template::TfResourceType;

/// `lambda` -> `aws_lambda_function`
pub struct LambdaFunctionConverter;

impl TerraformResourceConverter for LambdaFunctionConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let refs = TerraformReferences;

        let role = attrs
            .str_any(&["iam_role_name", "role"])?
            .ok_or_else(|| attrs.missing("iam_role_name"))?;

        let mut body = Body::new()
            .with("function_name", name)
            .with("role", refs.build_reference(role, ResourceKind::IamRole))
            .with("handler", attrs.required_str("func_name")?)
            .with("runtime", attrs.required_str("runtime")?)
            .with_opt("memory_size", attrs.int("memory")?)
            .with_opt("timeout", attrs.int("timeout")?);

        if let Some(key) = attrs.str("s3_path")? {
            body = match &ctx.settings.bundle_bucket {
                Some(bucket) => body.with("s3_bucket", bucket.as_str()).with("s3_key", key),
                None => body.with("filename", key),
            };
        }

        if let Some(variables) = attrs.object("env_variables")?.filter(|v| !v.is_empty()) {
            body.insert("environment", json!([{"variables": variables}]));
        }

        let subnets = attrs.str_list("subnet_ids")?;
        if !subnets.is_empty() {
            body.insert(
                "vpc_config",
                json!([{
                    "subnet_ids": subnets,
                    "security_group_ids": attrs.str_list("security_group_ids")?
                }]),
            );
        }

        if let Some(mode) = attrs.str("tracing_mode")? {
            body.insert("tracing_config", json!([{"mode": mode}]));
        }

        let layers: Vec<Value> = attrs
            .str_list("layers")?
            .iter()
            .map(|layer| match ctx.resources.lambda_layer_arn(layer) {
                Some(arn) => Value::String(arn),
                None => refs.build_reference(layer, ResourceKind::LambdaLayer),
            })
            .collect();

        let body = body
            .with_opt(
                "reserved_concurrent_executions",
                attrs.int("concurrency")?,
            )
            .with_list("layers", layers);

        ctx.template
            .add(TfResourceType::LambdaFunction, name, body.into_map())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TemplateSettings;
    use crate::infrastructure::resources::StaticResourcesProvider;
    use crate::infrastructure::terraform::converters::test_support::{convert, convert_with};

    fn lambda() -> Value {
        json!({
            "resource_type": "lambda",
            "iam_role_name": "lambda-role",
            "func_name": "handler.main",
            "runtime": "python3.12",
            "memory": 256,
            "timeout": "30",
            "s3_path": "lambdas/orders.zip"
        })
    }

    #[test]
    fn role_is_a_reference_not_a_literal() {
        let template = convert(&LambdaFunctionConverter, "orders", lambda()).unwrap();
        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();

        assert_eq!(function["role"], "${aws_iam_role.lambda-role.arn}");
        assert_eq!(function["handler"], "handler.main");
        assert_eq!(function["memory_size"], 256);
        assert_eq!(function["timeout"], 30);
    }

    #[test]
    fn role_alias_is_accepted() {
        let mut meta = lambda();
        meta.as_object_mut().unwrap().remove("iam_role_name");
        meta["role"] = json!("other-role");

        let template = convert(&LambdaFunctionConverter, "orders", meta).unwrap();
        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();
        assert_eq!(function["role"], "${aws_iam_role.other-role.arn}");
    }

    #[test]
    fn missing_role_fails() {
        let mut meta = lambda();
        meta.as_object_mut().unwrap().remove("iam_role_name");

        let err = convert(&LambdaFunctionConverter, "orders", meta).unwrap_err();
        assert!(err.to_string().contains("iam_role_name"));
    }

    #[test]
    fn bundle_goes_to_configured_bucket() {
        let settings = TemplateSettings {
            bundle_bucket: Some("artifacts".to_string()),
            ..TemplateSettings::default()
        };
        let template = convert_with(
            &LambdaFunctionConverter,
            &settings,
            &crate::domain::ports::NoResources,
            "orders",
            lambda(),
        )
        .unwrap();

        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();
        assert_eq!(function["s3_bucket"], "artifacts");
        assert_eq!(function["s3_key"], "lambdas/orders.zip");
        assert!(!function.contains_key("filename"));
    }

    #[test]
    fn bundle_without_bucket_is_a_local_file() {
        let template = convert(&LambdaFunctionConverter, "orders", lambda()).unwrap();
        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();
        assert_eq!(function["filename"], "lambdas/orders.zip");
    }

    #[test]
    fn optional_blocks() {
        let mut meta = lambda();
        meta["env_variables"] = json!({"TABLE": "orders"});
        meta["subnet_ids"] = json!(["subnet-1"]);
        meta["security_group_ids"] = json!(["sg-1"]);
        meta["tracing_mode"] = json!("Active");
        meta["concurrency"] = json!(5);

        let template = convert(&LambdaFunctionConverter, "orders", meta).unwrap();
        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();

        assert_eq!(function["environment"], json!([{"variables": {"TABLE": "orders"}}]));
        assert_eq!(
            function["vpc_config"],
            json!([{"subnet_ids": ["subnet-1"], "security_group_ids": ["sg-1"]}])
        );
        assert_eq!(function["tracing_config"], json!([{"mode": "Active"}]));
        assert_eq!(function["reserved_concurrent_executions"], 5);
    }

    #[test]
    fn layers_prefer_deployed_arns() {
        let mut provider = StaticResourcesProvider::default();
        provider.insert_lambda_layer("shared", "arn:aws:lambda:us-east-1:1:layer:shared:4");

        let mut meta = lambda();
        meta["layers"] = json!(["shared", "local"]);

        let template = convert_with(
            &LambdaFunctionConverter,
            &TemplateSettings::default(),
            &provider,
            "orders",
            meta,
        )
        .unwrap();

        let function = template.get(TfResourceType::LambdaFunction, "orders").unwrap();
        assert_eq!(
            function["layers"],
            json!([
                "arn:aws:lambda:us-east-1:1:layer:shared:4",
                "${aws_lambda_layer_version.local.arn}"
            ])
        );
    }
}
