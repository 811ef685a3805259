//! Kinds of resources a reference expression can address

/// A resource that another resource body can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    IamRole,
    IamPolicy,
    LambdaFunction,
    LambdaLayer,
    DynamoDbTable,
    S3Bucket,
    SnsTopic,
    SqsQueue,
    ApiGatewayRestApi,
    ApiGatewayResource,
    ApiGatewayDeployment,
    CloudWatchRule,
    BatchJobDefinition,
}

/// Attribute of a referenced resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Arn,
    Id,
    Name,
    RootResourceId,
    InvokeArn,
    ExecutionArn,
}

impl Attribute {
    /// Attribute name in snake case, as Terraform exposes it
    pub fn snake_name(&self) -> &'static str {
        match self {
            Attribute::Arn => "arn",
            Attribute::Id => "id",
            Attribute::Name => "name",
            Attribute::RootResourceId => "root_resource_id",
            Attribute::InvokeArn => "invoke_arn",
            Attribute::ExecutionArn => "execution_arn",
        }
    }
}
