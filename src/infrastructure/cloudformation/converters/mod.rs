//! CloudFormation resource converters
//!
//! Same layout as the Terraform converters: one converter per build meta
//! resource type, each adding resources keyed by logical id.

mod api_gateway;
mod batch;
mod cloudwatch;
mod dynamodb;
mod iam;
mod lambda;
mod s3;
mod sns;
mod sqs;

pub use api_gateway::ApiGatewayConverter;
pub use batch::BatchJobDefConverter;
pub use cloudwatch::CloudWatchRuleConverter;
pub use dynamodb::DynamoDbTableConverter;
pub use iam::{IamManagedPolicyConverter, IamRoleConverter};
pub use lambda::LambdaFunctionConverter;
pub use s3::S3BucketConverter;
pub use sns::SnsTopicConverter;
pub use sqs::SqsQueueConverter;

use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ResourcesProvider;
use crate::domain::value_objects::TemplateSettings;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::template::CloudFormationTemplate;

/// Everything a converter may touch during one conversion
pub struct CloudFormationContext<'a> {
    pub template: &'a mut CloudFormationTemplate,
    pub settings: &'a TemplateSettings,
    pub resources: &'a dyn ResourcesProvider,
}

/// Converts one build meta entry into CloudFormation resources
pub trait CloudFormationResourceConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::ports::NoResources;
    use serde_json::Value;

    pub fn convert_with(
        converter: &dyn CloudFormationResourceConverter,
        settings: &TemplateSettings,
        resources: &dyn ResourcesProvider,
        name: &str,
        attributes: Value,
    ) -> TransformResult<CloudFormationTemplate> {
        let mut template = CloudFormationTemplate::new();
        let resource = ResourceMeta::from_value(name, attributes)?;
        let mut ctx = CloudFormationContext {
            template: &mut template,
            settings,
            resources,
        };
        converter.convert(&mut ctx, name, &resource)?;
        Ok(template)
    }

    pub fn convert(
        converter: &dyn CloudFormationResourceConverter,
        name: &str,
        attributes: Value,
    ) -> TransformResult<CloudFormationTemplate> {
        convert_with(
            converter,
            &TemplateSettings::default(),
            &NoResources,
            name,
            attributes,
        )
    }
}
