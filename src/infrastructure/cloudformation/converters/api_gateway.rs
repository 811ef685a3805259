//! API gateway converter
//!
//! CloudFormation nests the integration and both response lists inside the
//! method resource, and supports the catch-all `ANY` method natively.

use std::collections::HashMap;

use serde_json::Value;

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::{Attribute, ResourceKind};
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::{execute_api_arn, ref_to, CloudFormationReferences};
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::{path_words, to_logical_id, ApiMethod, ApiSpec, Body, Integration};

pub const REST_API_TYPE: &str = "AWS::ApiGateway::RestApi";
pub const RESOURCE_TYPE: &str = "AWS::ApiGateway::Resource";
pub const METHOD_TYPE: &str = "AWS::ApiGateway::Method";
pub const DEPLOYMENT_TYPE: &str = "AWS::ApiGateway::Deployment";
pub const STAGE_TYPE: &str = "AWS::ApiGateway::Stage";
pub const PERMISSION_TYPE: &str = "AWS::Lambda::Permission";

fn resource_logical_id(api: &str, path: &str) -> String {
    to_logical_id(&format!("{} {} resource", api, path_words(path)))
}

fn method_logical_id(api: &str, method: &ApiMethod) -> String {
    to_logical_id(&format!(
        "{} {} {} method",
        api,
        path_words(&method.path),
        method.http_method.to_ascii_lowercase()
    ))
}

/// `api_gateway` -> rest API and its sub-resources
pub struct ApiGatewayConverter;

impl CloudFormationResourceConverter for ApiGatewayConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let spec = ApiSpec::parse(name, &attrs)?;
        let refs = CloudFormationReferences;
        let api_id = refs.attribute_reference(name, ResourceKind::ApiGatewayRestApi, Attribute::Id);
        let root_id =
            refs.attribute_reference(name, ResourceKind::ApiGatewayRestApi, Attribute::RootResourceId);

        let rest_api = Body::new()
            .with("Name", name)
            .with_opt("Description", attrs.str("description")?);
        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(REST_API_TYPE, rest_api.into_map()),
        )?;

        // path -> logical id of its resource node
        let mut node_ids: HashMap<&str, String> = HashMap::new();
        for node in &spec.resources {
            let parent_id = match node.parent.as_deref().and_then(|p| node_ids.get(p)) {
                Some(parent) => ref_to(parent),
                None => root_id.clone(),
            };
            let properties = Body::new()
                .with("RestApiId", api_id.clone())
                .with("ParentId", parent_id)
                .with("PathPart", node.path_part.as_str());
            let logical_id = ctx.template.free_id(&resource_logical_id(name, &node.path));
            ctx.template.add(
                &logical_id,
                CfResource::new(RESOURCE_TYPE, properties.into_map()),
            )?;
            node_ids.insert(node.path.as_str(), logical_id);
        }

        let mut method_ids = Vec::new();
        for method in &spec.methods {
            let resource_id = match node_ids.get(method.path.as_str()) {
                Some(node) => ref_to(node),
                None => root_id.clone(),
            };
            let logical_id = ctx.template.free_id(&method_logical_id(name, method));
            ctx.template.add(
                &logical_id,
                CfResource::new(
                    METHOD_TYPE,
                    method_properties(&api_id, resource_id, method).into_map(),
                ),
            )?;
            method_ids.push(logical_id);
        }

        for function in spec.invoked_functions() {
            let permission = Body::new()
                .with("Action", "lambda:InvokeFunction")
                .with(
                    "FunctionName",
                    refs.build_reference(function, ResourceKind::LambdaFunction),
                )
                .with("Principal", "apigateway.amazonaws.com")
                .with("SourceArn", execute_api_arn(name, "/*/*"));
            let logical_id = ctx
                .template
                .free_id(&to_logical_id(&format!("{} {} permission", name, function)));
            ctx.template.add(
                &logical_id,
                CfResource::new(PERMISSION_TYPE, permission.into_map()),
            )?;
        }

        let deployment_id = ctx
            .template
            .free_id(&to_logical_id(&format!("{} deployment", name)));
        ctx.template.add(
            &deployment_id,
            CfResource::new(
                DEPLOYMENT_TYPE,
                Body::new().with("RestApiId", api_id.clone()).into_map(),
            )
            .depends_on(method_ids),
        )?;

        let stage = Body::new()
            .with("StageName", spec.stage.as_str())
            .with("RestApiId", api_id)
            .with("DeploymentId", ref_to(&deployment_id));
        let stage_id = ctx
            .template
            .free_id(&to_logical_id(&format!("{} {} stage", name, spec.stage)));
        ctx.template
            .add(&stage_id, CfResource::new(STAGE_TYPE, stage.into_map()))
    }
}

fn method_properties(api_id: &Value, resource_id: Value, method: &ApiMethod) -> Body {
    let mut integration = Body::new().with("Type", method.integration.integration_type());
    match &method.integration {
        Integration::Lambda { function, .. } => {
            integration.insert("IntegrationHttpMethod", "POST");
            integration.insert(
                "Uri",
                CloudFormationReferences.attribute_reference(
                    function,
                    ResourceKind::LambdaFunction,
                    Attribute::InvokeArn,
                ),
            );
        }
        Integration::Http { uri, method: verb } | Integration::Service { uri, method: verb } => {
            integration.insert("IntegrationHttpMethod", verb.as_str());
            integration.insert("Uri", uri.as_str());
        }
        Integration::Mock => {}
    }

    let integration_responses: Vec<Value> = method
        .integration_responses
        .iter()
        .map(|response| {
            Value::from(
                Body::new()
                    .with("StatusCode", response.status_code.as_str())
                    .with_opt("SelectionPattern", response.selection_pattern.as_deref())
                    .with_object("ResponseParameters", response.response_parameters.clone())
                    .with_object("ResponseTemplates", response.response_templates.clone()),
            )
        })
        .collect();
    let integration = integration
        .with_object("RequestTemplates", method.request_templates.clone())
        .with_list("IntegrationResponses", integration_responses);

    let method_responses: Vec<Value> = method
        .responses
        .iter()
        .map(|response| {
            Value::from(
                Body::new()
                    .with("StatusCode", response.status_code.as_str())
                    .with_object("ResponseParameters", response.response_parameters.clone()),
            )
        })
        .collect();

    Body::new()
        .with("RestApiId", api_id.clone())
        .with("ResourceId", resource_id)
        .with("HttpMethod", method.http_method.as_str())
        .with("AuthorizationType", method.authorization.as_str())
        .with("ApiKeyRequired", method.api_key_required)
        .with_object("RequestParameters", method.request_parameters.clone())
        .with("Integration", integration)
        .with_list("MethodResponses", method_responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoResources;
    use crate::domain::value_objects::TemplateSettings;
    use crate::infrastructure::cloudformation::converters::test_support::convert;
    use crate::infrastructure::cloudformation::template::CloudFormationTemplate;
    use serde_json::json;

    fn api(resources: Value) -> CloudFormationTemplate {
        convert(
            &ApiGatewayConverter,
            "shop",
            json!({"resource_type": "api_gateway", "resources": resources}),
        )
        .unwrap()
    }

    #[test]
    fn catch_all_method_is_kept() {
        let template = api(json!({"/": {"ANY": {}}}));

        let method = template.get("ShopRootAnyMethod").unwrap();
        assert_eq!(method.properties["HttpMethod"], "ANY");
        assert_eq!(
            method.properties["ResourceId"],
            json!({"Fn::GetAtt": ["Shop", "RootResourceId"]})
        );
        assert_eq!(method.properties["Integration"]["Type"], "MOCK");
    }

    #[test]
    fn nested_resources_reference_parents() {
        let template = api(json!({"/orders/{id}": {"GET": {}}}));

        let item = template.get("ShopOrdersIdResource").unwrap();
        assert_eq!(item.properties["ParentId"], json!({"Ref": "ShopOrdersResource"}));
        assert_eq!(item.properties["PathPart"], "{id}");
        assert_eq!(item.properties["RestApiId"], json!({"Ref": "Shop"}));
    }

    #[test]
    fn lambda_method_with_permission_deployment_and_stage() {
        let template = api(json!({"/orders": {"POST": {
            "integration_type": "lambda",
            "lambda_name": "create-order"
        }}}));

        let method = template.get("ShopOrdersPostMethod").unwrap();
        assert_eq!(method.properties["Integration"]["Type"], "AWS");
        assert_eq!(
            method.properties["Integration"]["IntegrationResponses"],
            json!([{"StatusCode": "200"}])
        );
        assert_eq!(
            method.properties["MethodResponses"],
            json!([{"StatusCode": "200"}])
        );

        let permission = template.get("ShopCreateOrderPermission").unwrap();
        assert_eq!(
            permission.properties["FunctionName"],
            json!({"Fn::GetAtt": ["CreateOrder", "Arn"]})
        );
        assert_eq!(
            permission.properties["SourceArn"],
            json!({"Fn::Sub": "arn:${AWS::Partition}:execute-api:${AWS::Region}:${AWS::AccountId}:${Shop}/*/*"})
        );

        let deployment = template.get("ShopDeployment").unwrap();
        assert_eq!(deployment.depends_on, vec!["ShopOrdersPostMethod".to_string()]);

        let stage = template.get("ShopProdStage").unwrap();
        assert_eq!(stage.properties["DeploymentId"], json!({"Ref": "ShopDeployment"}));
    }

    #[test]
    fn paths_with_the_same_words_get_distinct_ids() {
        let template = api(json!({"/a/b": {"GET": {}}, "/a_b": {"GET": {}}}));

        assert_eq!(
            template.ids_of_type(RESOURCE_TYPE),
            vec!["ShopAResource", "ShopABResource", "ShopABResource2"]
        );
        assert_eq!(
            template.ids_of_type(METHOD_TYPE),
            vec!["ShopABGetMethod", "ShopABGetMethod2"]
        );
        let nested = template.get("ShopABGetMethod").unwrap();
        assert_eq!(nested.properties["ResourceId"], json!({"Ref": "ShopABResource"}));
        let flat = template.get("ShopABGetMethod2").unwrap();
        assert_eq!(flat.properties["ResourceId"], json!({"Ref": "ShopABResource2"}));
    }

    #[test]
    fn generated_ids_avoid_reserved_entry_ids() {
        let mut template = CloudFormationTemplate::new();
        template.reserve("ShopDeployment");
        let resource = ResourceMeta::from_value(
            "shop",
            json!({"resource_type": "api_gateway", "resources": {"/": {"GET": {}}}}),
        )
        .unwrap();
        let settings = TemplateSettings::default();
        let mut ctx = CloudFormationContext {
            template: &mut template,
            settings: &settings,
            resources: &NoResources,
        };
        ApiGatewayConverter.convert(&mut ctx, "shop", &resource).unwrap();

        assert!(!template.contains("ShopDeployment"));
        let stage = template.get("ShopProdStage").unwrap();
        assert_eq!(stage.properties["DeploymentId"], json!({"Ref": "ShopDeployment2"}));
    }
}
