//! Terraform resource converters
//!
//! One converter per build meta resource type. Each reads the entry's
//! attributes and appends its blocks to the shared [`TerraformTemplate`].

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
pub use cloudwatch::{CloudWatchAlarmConverter, CloudWatchRuleConverter};
pub use dynamodb::{DynamoDbStreamConverter, DynamoDbTableConverter};
pub use iam::{IamManagedPolicyConverter, IamRoleConverter};
pub use lambda::LambdaFunctionConverter;
pub use s3::S3BucketConverter;
pub use sns::SnsTopicConverter;
pub use sqs::SqsQueueConverter;

use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ResourcesProvider;
use crate::domain::value_objects::TemplateSettings;
use crate::error::TransformResult;
use crate::infrastructure::terraform::template::TerraformTemplate;

/// Everything a converter may touch during one conversion
pub struct TerraformContext<'a> {
    pub template: &'a mut TerraformTemplate,
    pub settings: &'a TemplateSettings,
    pub resources: &'a dyn ResourcesProvider,
}

/// Converts one build meta entry into Terraform blocks
pub trait TerraformResourceConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::ports::NoResources;
    use serde_json::Value;

    /// Convert `attributes` (with `resource_type`) into a fresh template
    pub fn convert_with(
        converter: &dyn TerraformResourceConverter,
        settings: &TemplateSettings,
        resources: &dyn ResourcesProvider,
        name: &str,
        attributes: Value,
    ) -> TransformResult<TerraformTemplate> {
        let mut template = TerraformTemplate::new(settings);
        let resource = ResourceMeta::from_value(name, attributes)?;
        let mut ctx = TerraformContext {
            template: &mut template,
            settings,
            resources,
        };
        converter.convert(&mut ctx, name, &resource)?;
        Ok(template)
    }

    pub fn convert(
        converter: &dyn TerraformResourceConverter,
        name: &str,
        attributes: Value,
    ) -> TransformResult<TerraformTemplate> {
        convert_with(
            converter,
            &TemplateSettings::default(),
            &NoResources,
            name,
            attributes,
        )
    }
}
