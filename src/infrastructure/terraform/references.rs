//! Terraform reference expressions
//!
//! Terraform addresses another resource through string interpolation:
//! `${aws_iam_role.lambda-role.arn}`.

use serde_json::Value;

use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::{Attribute, ResourceKind};

/// Terraform resource type label for a referenced kind
pub fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::IamRole => "aws_iam_role",
        ResourceKind::IamPolicy => "aws_iam_policy",
        ResourceKind::LambdaFunction => "aws_lambda_function",
        ResourceKind::LambdaLayer => "aws_lambda_layer_version",
        ResourceKind::DynamoDbTable => "aws_dynamodb_table",
        ResourceKind::S3Bucket => "aws_s3_bucket",
        ResourceKind::SnsTopic => "aws_sns_topic",
        ResourceKind::SqsQueue => "aws_sqs_queue",
        ResourceKind::ApiGatewayRestApi => "aws_api_gateway_rest_api",
        ResourceKind::ApiGatewayResource => "aws_api_gateway_resource",
        ResourceKind::ApiGatewayDeployment => "aws_api_gateway_deployment",
        ResourceKind::CloudWatchRule => "aws_cloudwatch_event_rule",
        ResourceKind::BatchJobDefinition => "aws_batch_job_definition",
    }
}

/// Interpolation string for `attribute` of `name`
pub fn interpolation(name: &str, kind: ResourceKind, attribute: Attribute) -> String {
    format!(
        "${{{}.{}.{}}}",
        kind_label(kind),
        name,
        attribute.snake_name()
    )
}

pub fn build_role_arn_ref(role_name: &str) -> String {
    interpolation(role_name, ResourceKind::IamRole, Attribute::Arn)
}

pub fn build_policy_arn_ref(policy_name: &str) -> String {
    interpolation(policy_name, ResourceKind::IamPolicy, Attribute::Arn)
}

pub fn build_sns_topic_arn_ref(topic_name: &str) -> String {
    interpolation(topic_name, ResourceKind::SnsTopic, Attribute::Arn)
}

pub fn build_sqs_queue_arn_ref(queue_name: &str) -> String {
    interpolation(queue_name, ResourceKind::SqsQueue, Attribute::Arn)
}

/// Stateless Terraform reference builder
#[derive(Debug, Clone, Copy, Default)]
pub struct TerraformReferences;

impl ReferenceBuilder for TerraformReferences {
    fn attribute_reference(&self, name: &str, kind: ResourceKind, attribute: Attribute) -> Value {
        Value::String(interpolation(name, kind, attribute))
    }
}
