//! API gateway converter
//!
//! Expands one API definition into the rest API, one resource per path
//! segment, method/integration/response blocks per method, lambda invoke
//! permissions, a deployment and its stage.

use serde_json::{json, Value};
use tracing::warn;

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::{Attribute, ResourceKind};
use crate::error::TransformResult;
use crate::infrastructure::shared::api_spec::CATCH_ALL_METHOD;
use crate::infrastructure::shared::{path_slug, tf_name, ApiMethod, ApiSpec, Body, Integration};
use crate::infrastructure::terraform::references::TerraformReferences;
use crate::infrastructure::terraform::template::TfResourceType;

/// Terraform has no any-method primitive; catch-all methods become this verb
pub const CATCH_ALL_REPLACEMENT: &str = "GET";

/// `api_gateway` -> rest API and its sub-resources
pub struct ApiGatewayConverter;

impl TerraformResourceConverter for ApiGatewayConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let spec = ApiSpec::parse(name, &attrs)?;
        let refs = TerraformReferences;
        let api_id = refs.attribute_reference(name, ResourceKind::ApiGatewayRestApi, Attribute::Id);

        let rest_api = Body::new()
            .with("name", name)
            .with_opt("description", attrs.str("description")?);
        ctx.template
            .add(TfResourceType::ApiGatewayRestApi, name, rest_api.into_map())?;

        for node in &spec.resources {
            let parent_id = match &node.parent {
                Some(parent) => resource_id(name, parent),
                None => refs.attribute_reference(
                    name,
                    ResourceKind::ApiGatewayRestApi,
                    Attribute::RootResourceId,
                ),
            };
            let body = Body::new()
                .with("rest_api_id", api_id.clone())
                .with("parent_id", parent_id)
                .with("path_part", node.path_part.as_str());
            ctx.template.add(
                TfResourceType::ApiGatewayResource,
                &resource_entry_name(name, &node.path),
                body.into_map(),
            )?;
        }

        let mut deployment_dependencies = Vec::new();
        for method in &spec.methods {
            let Some(http_method) = terraform_method(&spec, method) else {
                continue;
            };
            let entry = tf_name(&[
                name,
                &path_slug(&method.path),
                &http_method.to_ascii_lowercase(),
            ]);
            add_method(ctx, name, &api_id, method, &http_method, &entry)?;
            deployment_dependencies.push(TfResourceType::ApiGatewayMethod.address(&entry));
            deployment_dependencies.push(TfResourceType::ApiGatewayIntegration.address(&entry));
        }

        for function in spec.invoked_functions() {
            let permission = Body::new()
                .with("statement_id", "AllowExecutionFromAPIGateway")
                .with("action", "lambda:InvokeFunction")
                .with(
                    "function_name",
                    refs.build_reference(function, ResourceKind::LambdaFunction),
                )
                .with("principal", "apigateway.amazonaws.com")
                .with(
                    "source_arn",
                    format!(
                        "{}/*/*",
                        TfResourceType::ApiGatewayRestApi.reference(name, "execution_arn")
                    ),
                );
            ctx.template.add(
                TfResourceType::LambdaPermission,
                &tf_name(&[name, function, "permission"]),
                permission.into_map(),
            )?;
        }

        let deployment = Body::new()
            .with("rest_api_id", api_id.clone())
            .with_list("depends_on", deployment_dependencies);
        ctx.template
            .add(TfResourceType::ApiGatewayDeployment, name, deployment.into_map())?;

        let stage = Body::new()
            .with("stage_name", spec.stage.as_str())
            .with("rest_api_id", api_id)
            .with(
                "deployment_id",
                refs.attribute_reference(name, ResourceKind::ApiGatewayDeployment, Attribute::Id),
            );
        ctx.template.add(
            TfResourceType::ApiGatewayStage,
            &tf_name(&[name, &spec.stage]),
            stage.into_map(),
        )?;
        Ok(())
    }
}

fn resource_entry_name(api: &str, path: &str) -> String {
    tf_name(&[api, &path_slug(path)])
}

/// Id of the resource node at `path`; the root path is the API's root resource
fn resource_id(api: &str, path: &str) -> Value {
    if path == "/" {
        TerraformReferences.attribute_reference(
            api,
            ResourceKind::ApiGatewayRestApi,
            Attribute::RootResourceId,
        )
    } else {
        TerraformReferences.attribute_reference(
            &resource_entry_name(api, path),
            ResourceKind::ApiGatewayResource,
            Attribute::Id,
        )
    }
}

/// Verb to emit for `method`, or `None` when a remapped catch-all would
/// collide with an explicit method on the same path
fn terraform_method(spec: &ApiSpec, method: &ApiMethod) -> Option<String> {
    if method.http_method != CATCH_ALL_METHOD {
        return Some(method.http_method.clone());
    }
    let collides = spec
        .methods
        .iter()
        .any(|other| other.path == method.path && other.http_method == CATCH_ALL_REPLACEMENT);
    if collides {
        warn!(
            api = %spec.name,
            path = %method.path,
            "catch-all method dropped: {} already defined on this path",
            CATCH_ALL_REPLACEMENT
        );
        return None;
    }
    Some(CATCH_ALL_REPLACEMENT.to_string())
}

fn add_method(
    ctx: &mut TerraformContext<'_>,
    api: &str,
    api_id: &Value,
    method: &ApiMethod,
    http_method: &str,
    entry: &str,
) -> TransformResult<()> {
    let resource_id = resource_id(api, &method.path);
    let method_ref = TfResourceType::ApiGatewayMethod.reference(entry, "http_method");

    let body = Body::new()
        .with("rest_api_id", api_id.clone())
        .with("resource_id", resource_id.clone())
        .with("http_method", http_method)
        .with("authorization", method.authorization.as_str())
        .with("api_key_required", method.api_key_required)
        .with_object("request_parameters", method.request_parameters.clone());
    ctx.template
        .add(TfResourceType::ApiGatewayMethod, entry, body.into_map())?;

    let mut integration = Body::new()
        .with("rest_api_id", api_id.clone())
        .with("resource_id", resource_id.clone())
        .with("http_method", method_ref.clone())
        .with("type", method.integration.integration_type());
    match &method.integration {
        Integration::Lambda { function, .. } => {
            integration.insert("integration_http_method", "POST");
            integration.insert(
                "uri",
                TerraformReferences.attribute_reference(
                    function,
                    ResourceKind::LambdaFunction,
                    Attribute::InvokeArn,
                ),
            );
        }
        Integration::Http { uri, method: verb }
        | Integration::Service { uri, method: verb } => {
            integration.insert("integration_http_method", verb.as_str());
            integration.insert("uri", uri.as_str());
        }
        Integration::Mock => {}
    }
    let integration = integration
        .with_object("request_templates", method.request_templates.clone())
        .into_map();
    ctx.template
        .add(TfResourceType::ApiGatewayIntegration, entry, integration)?;

    for response in &method.responses {
        let body = Body::new()
            .with("rest_api_id", api_id.clone())
            .with("resource_id", resource_id.clone())
            .with("http_method", method_ref.clone())
            .with("status_code", response.status_code.as_str())
            .with_object("response_parameters", response.response_parameters.clone());
        ctx.template.add(
            TfResourceType::ApiGatewayMethodResponse,
            &tf_name(&[entry, &response.status_code]),
            body.into_map(),
        )?;
    }

    for response in &method.integration_responses {
        let response_entry = tf_name(&[entry, &response.status_code]);
        let body = Body::new()
            .with("rest_api_id", api_id.clone())
            .with("resource_id", resource_id.clone())
            .with("http_method", method_ref.clone())
            .with("status_code", response.status_code.as_str())
            .with_opt("selection_pattern", response.selection_pattern.as_deref())
            .with_object("response_parameters", response.response_parameters.clone())
            .with_object("response_templates", response.response_templates.clone())
            .with(
                "depends_on",
                json!([TfResourceType::ApiGatewayIntegration.address(entry)]),
            );
        ctx.template.add(
            TfResourceType::ApiGatewayIntegrationResponse,
            &response_entry,
            body.into_map(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoResources;
    use crate::domain::value_objects::TemplateSettings;
    use crate::infrastructure::terraform::converters::test_support::convert;
    use crate::infrastructure::terraform::template::TerraformTemplate;

    fn api(resources: Value) -> TerraformTemplate {
        convert(
            &ApiGatewayConverter,
            "shop",
            json!({"resource_type": "api_gateway", "resources": resources}),
        )
        .unwrap()
    }

    #[test]
    fn nested_resources_link_to_parents() {
        let template = api(json!({"/orders/{id}": {"GET": {}}}));

        let orders = template
            .get(TfResourceType::ApiGatewayResource, "shop_orders")
            .unwrap();
        assert_eq!(orders["parent_id"], "${aws_api_gateway_rest_api.shop.root_resource_id}");
        assert_eq!(orders["path_part"], "orders");

        let item = template
            .get(TfResourceType::ApiGatewayResource, "shop_orders_-oid-c")
            .unwrap();
        assert_eq!(item["parent_id"], "${aws_api_gateway_resource.shop_orders.id}");
        assert_eq!(item["path_part"], "{id}");

        let method = template
            .get(TfResourceType::ApiGatewayMethod, "shop_orders_-oid-c_get")
            .unwrap();
        assert_eq!(method["resource_id"], "${aws_api_gateway_resource.shop_orders_-oid-c.id}");
        assert_eq!(method["authorization"], "NONE");
    }

    #[test]
    fn catch_all_becomes_get() {
        let template = api(json!({"/": {"ANY": {}}}));

        let method = template
            .get(TfResourceType::ApiGatewayMethod, "shop__root_get")
            .unwrap();
        assert_eq!(method["http_method"], "GET");
        assert_eq!(
            method["resource_id"],
            "${aws_api_gateway_rest_api.shop.root_resource_id}"
        );
    }

    #[test]
    fn catch_all_is_dropped_when_get_exists() {
        let template = api(json!({"/items": {"GET": {}, "ANY": {}}}));
        assert_eq!(template.resources(TfResourceType::ApiGatewayMethod).len(), 1);
    }

    #[test]
    fn lambda_integration_emits_permission() {
        let template = api(json!({"/orders": {"POST": {
            "integration_type": "lambda",
            "lambda_name": "create-order",
            "enable_proxy": true
        }}}));

        let integration = template
            .get(TfResourceType::ApiGatewayIntegration, "shop_orders_post")
            .unwrap();
        assert_eq!(integration["type"], "AWS_PROXY");
        assert_eq!(integration["integration_http_method"], "POST");
        assert_eq!(
            integration["uri"],
            "${aws_lambda_function.create-order.invoke_arn}"
        );
        assert_eq!(
            integration["http_method"],
            "${aws_api_gateway_method.shop_orders_post.http_method}"
        );

        let permission = template
            .get(TfResourceType::LambdaPermission, "shop_create-order_permission")
            .unwrap();
        assert_eq!(permission["principal"], "apigateway.amazonaws.com");
        assert_eq!(
            permission["source_arn"],
            "${aws_api_gateway_rest_api.shop.execution_arn}/*/*"
        );
        assert!(template
            .resources(TfResourceType::ApiGatewayIntegrationResponse)
            .is_empty());
    }

    #[test]
    fn deployment_depends_on_methods_and_stage_defaults_to_prod() {
        let template = api(json!({"/health": {"GET": {}}}));

        let deployment = template
            .get(TfResourceType::ApiGatewayDeployment, "shop")
            .unwrap();
        assert_eq!(
            deployment["depends_on"],
            json!([
                "aws_api_gateway_method.shop_health_get",
                "aws_api_gateway_integration.shop_health_get"
            ])
        );

        let stage = template
            .get(TfResourceType::ApiGatewayStage, "shop_prod")
            .unwrap();
        assert_eq!(stage["deployment_id"], "${aws_api_gateway_deployment.shop.id}");
        assert_eq!(
            template
                .get(TfResourceType::ApiGatewayIntegrationResponse, "shop_health_get_200")
                .unwrap()["status_code"],
            "200"
        );
    }

    fn names(template: &TerraformTemplate, resource_type: TfResourceType) -> Vec<&str> {
        template
            .resources(resource_type)
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    #[test]
    fn root_and_literal_root_path_get_distinct_names() {
        let template = api(json!({"/": {"GET": {}}, "/root": {"GET": {}}}));

        assert_eq!(
            names(&template, TfResourceType::ApiGatewayMethod),
            vec!["shop__root_get", "shop_root_get"]
        );
        let literal = template
            .get(TfResourceType::ApiGatewayMethod, "shop_root_get")
            .unwrap();
        assert_eq!(literal["resource_id"], "${aws_api_gateway_resource.shop_root.id}");
    }

    #[test]
    fn nested_and_underscored_paths_get_distinct_names() {
        let template = api(json!({"/a/b": {"GET": {}}, "/a_b": {"GET": {}}}));

        assert_eq!(
            names(&template, TfResourceType::ApiGatewayResource),
            vec!["shop_a", "shop_a_b", "shop_a-_b"]
        );
        assert_eq!(
            names(&template, TfResourceType::ApiGatewayMethod),
            vec!["shop_a_b_get", "shop_a-_b_get"]
        );
    }

    #[test]
    fn colliding_entry_names_fail_the_conversion() {
        let settings = TemplateSettings::default();
        let mut template = TerraformTemplate::new(&settings);
        template
            .add(TfResourceType::ApiGatewayRestApi, "shop", serde_json::Map::new())
            .unwrap();
        let resource = ResourceMeta::from_value(
            "shop",
            json!({"resource_type": "api_gateway", "resources": {"/": {"GET": {}}}}),
        )
        .unwrap();
        let mut ctx = TerraformContext {
            template: &mut template,
            settings: &settings,
            resources: &NoResources,
        };

        let err = ApiGatewayConverter.convert(&mut ctx, "shop", &resource).unwrap_err();
        assert!(err.to_string().contains("duplicate aws_api_gateway_rest_api resource 'shop'"));
    }
}
