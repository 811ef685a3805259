//! ResourceType value object - the build-meta `resource_type` tag

use std::str::FromStr;

/// Resource types a build meta entry can carry.
///
/// Parsing is deliberately lenient: an unrecognized tag is not an error, the
/// transformer just skips entries whose tag does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    IamManagedPolicy,
    IamRole,
    Lambda,
    DynamoDbTable,
    DynamoDbStream,
    S3Bucket,
    SnsTopic,
    SqsQueue,
    ApiGateway,
    CloudWatchRule,
    CloudWatchAlarm,
    BatchJobDefinition,
}

impl ResourceType {
    pub const ALL: [ResourceType; 12] = [
        ResourceType::IamManagedPolicy,
        ResourceType::IamRole,
        ResourceType::Lambda,
        ResourceType::DynamoDbTable,
        ResourceType::DynamoDbStream,
        ResourceType::S3Bucket,
        ResourceType::SnsTopic,
        ResourceType::SqsQueue,
        ResourceType::ApiGateway,
        ResourceType::CloudWatchRule,
        ResourceType::CloudWatchAlarm,
        ResourceType::BatchJobDefinition,
    ];

    /// Build-meta tag for this type
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceType::IamManagedPolicy => "iam_managed_policy",
            ResourceType::IamRole => "iam_role",
            ResourceType::Lambda => "lambda",
            ResourceType::DynamoDbTable => "dynamodb_table",
            ResourceType::DynamoDbStream => "dynamodb_stream",
            ResourceType::S3Bucket => "s3_bucket",
            ResourceType::SnsTopic => "sns_topic",
            ResourceType::SqsQueue => "sqs_queue",
            ResourceType::ApiGateway => "api_gateway",
            ResourceType::CloudWatchRule => "cloudwatch_rule",
            ResourceType::CloudWatchAlarm => "cloudwatch_alarm",
            ResourceType::BatchJobDefinition => "batch_job_definition",
        }
    }

    /// Parse a tag, returning `None` for anything unsupported
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported resource type '{}'", s))
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
