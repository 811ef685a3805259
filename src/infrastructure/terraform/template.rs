//! In-memory Terraform document
//!
//! Converters append `{name: body}` entries into per-label buckets. Buckets
//! compose in the fixed order of [`TfResourceType`]; entries keep insertion
//! order inside their bucket.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::domain::value_objects::TemplateSettings;
use crate::error::{TransformError, TransformResult};

pub const PROVIDER_KEY: &str = "provider";
pub const RESOURCE_KEY: &str = "resource";

/// Terraform resource type labels, in compose order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TfResourceType {
    LambdaFunction,
    LambdaPermission,
    IamPolicy,
    IamRole,
    DynamoDbTable,
    AppAutoscalingTarget,
    AppAutoscalingPolicy,
    ApiGatewayRestApi,
    ApiGatewayResource,
    ApiGatewayMethodResponse,
    ApiGatewayIntegration,
    ApiGatewayStage,
    ApiGatewayDeployment,
    ApiGatewayIntegrationResponse,
    ApiGatewayMethod,
    S3Bucket,
    SnsTopic,
    SqsQueue,
    CloudWatchEventRule,
    CloudWatchMetricAlarm,
    BatchJobDefinition,
}

impl TfResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            TfResourceType::LambdaFunction => "aws_lambda_function",
            TfResourceType::LambdaPermission => "aws_lambda_permission",
            TfResourceType::IamPolicy => "aws_iam_policy",
            TfResourceType::IamRole => "aws_iam_role",
            TfResourceType::DynamoDbTable => "aws_dynamodb_table",
            TfResourceType::AppAutoscalingTarget => "aws_appautoscaling_target",
            TfResourceType::AppAutoscalingPolicy => "aws_appautoscaling_policy",
            TfResourceType::ApiGatewayRestApi => "aws_api_gateway_rest_api",
            TfResourceType::ApiGatewayResource => "aws_api_gateway_resource",
            TfResourceType::ApiGatewayMethodResponse => "aws_api_gateway_method_response",
            TfResourceType::ApiGatewayIntegration => "aws_api_gateway_integration",
            TfResourceType::ApiGatewayStage => "aws_api_gateway_stage",
            TfResourceType::ApiGatewayDeployment => "aws_api_gateway_deployment",
            TfResourceType::ApiGatewayIntegrationResponse => {
                "aws_api_gateway_integration_response"
            }
            TfResourceType::ApiGatewayMethod => "aws_api_gateway_method",
            TfResourceType::S3Bucket => "aws_s3_bucket",
            TfResourceType::SnsTopic => "aws_sns_topic",
            TfResourceType::SqsQueue => "aws_sqs_queue",
            TfResourceType::CloudWatchEventRule => "aws_cloudwatch_event_rule",
            TfResourceType::CloudWatchMetricAlarm => "aws_cloudwatch_metric_alarm",
            TfResourceType::BatchJobDefinition => "aws_batch_job_definition",
        }
    }

    /// `label.name` address used in `depends_on`
    pub fn address(&self, name: &str) -> String {
        format!("{}.{}", self.label(), name)
    }

    /// Interpolation of `attribute` on the generated entry `name`
    pub fn reference(&self, name: &str, attribute: &str) -> String {
        format!("${{{}.{}}}", self.address(name), attribute)
    }
}

/// Accumulated Terraform configuration for one pass
#[derive(Debug, Clone)]
pub struct TerraformTemplate {
    provider: String,
    profile: String,
    region: String,
    resources: BTreeMap<TfResourceType, Vec<(String, Map<String, Value>)>>,
    /// Stream annotations whose table has not been added yet: table -> view type
    pending_streams: IndexMap<String, String>,
}

impl TerraformTemplate {
    pub fn new(settings: &TemplateSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            profile: settings.profile.clone(),
            region: settings.region.clone(),
            resources: BTreeMap::new(),
            pending_streams: IndexMap::new(),
        }
    }

    /// Append one `{name: body}` entry under `resource_type`. Names are unique
    /// per label.
    pub fn add(
        &mut self,
        resource_type: TfResourceType,
        name: &str,
        mut body: Map<String, Value>,
    ) -> TransformResult<()> {
        if self.contains(resource_type, name) {
            return Err(TransformError::DuplicateResource {
                label: resource_type.label().to_string(),
                name: name.to_string(),
            });
        }

        if resource_type == TfResourceType::DynamoDbTable {
            let table_name = body.get("name").and_then(Value::as_str).map(str::to_string);
            if let Some(view_type) = table_name.and_then(|t| self.pending_streams.shift_remove(&t))
            {
                debug!(table = name, %view_type, "applying deferred stream annotation");
                enable_stream(&mut body, &view_type);
            }
        }

        self.resources
            .entry(resource_type)
            .or_default()
            .push((name.to_string(), body));
        Ok(())
    }

    /// Enable streaming on the table whose `name` is `table_name`.
    ///
    /// If that table is not in the document yet, the annotation is applied
    /// when it is added.
    pub fn add_dynamo_db_stream(&mut self, table_name: &str, view_type: &str) {
        let mut matched = false;
        if let Some(tables) = self.resources.get_mut(&TfResourceType::DynamoDbTable) {
            for (_, body) in tables.iter_mut() {
                if body.get("name").and_then(Value::as_str) == Some(table_name) {
                    enable_stream(body, view_type);
                    matched = true;
                }
            }
        }

        if !matched {
            debug!(
                table = table_name,
                "stream references a table not converted yet; deferring"
            );
            self.pending_streams
                .insert(table_name.to_string(), view_type.to_string());
        }
    }

    /// Entries accumulated under `resource_type`, in insertion order
    pub fn resources(&self, resource_type: TfResourceType) -> &[(String, Map<String, Value>)] {
        self.resources
            .get(&resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Body of the entry `name` under `resource_type`
    pub fn get(&self, resource_type: TfResourceType, name: &str) -> Option<&Map<String, Value>> {
        self.resources(resource_type)
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, body)| body)
    }

    pub fn contains(&self, resource_type: TfResourceType, name: &str) -> bool {
        self.get(resource_type, name).is_some()
    }

    /// Tables named by a stream annotation that no converted table matched
    pub fn unmatched_streams(&self) -> impl Iterator<Item = &str> {
        self.pending_streams.keys().map(String::as_str)
    }

    /// Serialize to the Terraform JSON document
    pub fn compose(&self) -> TransformResult<String> {
        for table in self.unmatched_streams() {
            warn!(table, "stream annotation dropped: no table with this name");
        }

        let provider = json!([{
            self.provider.as_str(): [{
                "profile": self.profile,
                "region": self.region,
            }]
        }]);

        let resources: Vec<Value> = self
            .resources
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(resource_type, entries)| {
                let entries: Vec<Value> = entries
                    .iter()
                    .map(|(name, body)| {
                        let mut entry = Map::new();
                        entry.insert(name.clone(), Value::Object(body.clone()));
                        Value::Object(entry)
                    })
                    .collect();
                json!({ resource_type.label(): entries })
            })
            .collect();

        let mut document = Map::new();
        document.insert(PROVIDER_KEY.to_string(), provider);
        document.insert(RESOURCE_KEY.to_string(), Value::Array(resources));

        Ok(serde_json::to_string_pretty(&Value::Object(document))?)
    }
}

fn enable_stream(body: &mut Map<String, Value>, view_type: &str) {
    body.insert("stream_enabled".to_string(), Value::Bool(true));
    body.insert(
        "stream_view_type".to_string(),
        Value::String(view_type.to_string()),
    );
}
