//! Terraform JSON flavor

pub mod converters;
pub mod references;
pub mod template;

pub use references::TerraformReferences;
pub use template::{TerraformTemplate, TfResourceType};

use converters::{
    ApiGatewayConverter, BatchJobDefConverter, CloudWatchAlarmConverter, CloudWatchRuleConverter,
    DynamoDbStreamConverter, DynamoDbTableConverter, IamManagedPolicyConverter, IamRoleConverter,
    LambdaFunctionConverter, S3BucketConverter, SnsTopicConverter, SqsQueueConverter,
    TerraformContext, TerraformResourceConverter,
};

use crate::domain::entities::ResourceMeta;
use crate::domain::ports::{ResourcesProvider, TemplateTransformer};
use crate::domain::value_objects::{Flavor, TemplateSettings};
use crate::error::TransformResult;

/// Builds one Terraform document per pass
pub struct TerraformTransformer<'a> {
    template: TerraformTemplate,
    settings: &'a TemplateSettings,
    resources: &'a dyn ResourcesProvider,
}

impl<'a> TerraformTransformer<'a> {
    pub fn new(settings: &'a TemplateSettings, resources: &'a dyn ResourcesProvider) -> Self {
        Self {
            template: TerraformTemplate::new(settings),
            settings,
            resources,
        }
    }

    /// Document accumulated so far
    pub fn template(&self) -> &TerraformTemplate {
        &self.template
    }

    fn convert(
        &mut self,
        converter: &dyn TerraformResourceConverter,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let mut ctx = TerraformContext {
            template: &mut self.template,
            settings: self.settings,
            resources: self.resources,
        };
        converter.convert(&mut ctx, name, resource)
    }
}

impl TemplateTransformer for TerraformTransformer<'_> {
    fn flavor(&self) -> Flavor {
        Flavor::Terraform
    }

    fn transform_iam_managed_policy(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&IamManagedPolicyConverter, name, resource)
    }

    fn transform_iam_role(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()> {
        self.convert(&IamRoleConverter, name, resource)
    }

    fn transform_lambda(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()> {
        self.convert(&LambdaFunctionConverter, name, resource)
    }

    fn transform_dynamo_db_table(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&DynamoDbTableConverter, name, resource)
    }

    fn transform_dynamo_db_stream(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&DynamoDbStreamConverter, name, resource)
    }

    fn transform_s3_bucket(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()> {
        self.convert(&S3BucketConverter, name, resource)
    }

    fn transform_sns_topic(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()> {
        self.convert(&SnsTopicConverter, name, resource)
    }

    fn transform_sqs_queue(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()> {
        self.convert(&SqsQueueConverter, name, resource)
    }

    fn transform_api_gateway(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&ApiGatewayConverter, name, resource)
    }

    fn transform_cloudwatch_rule(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&CloudWatchRuleConverter, name, resource)
    }

    fn transform_cloudwatch_alarm(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&CloudWatchAlarmConverter, name, resource)
    }

    fn transform_batch_job_definition(
        &mut self,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        self.convert(&BatchJobDefConverter, name, resource)
    }

    fn compose_template(&self) -> TransformResult<String> {
        self.template.compose()
    }
}
