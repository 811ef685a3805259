//! CloudFormation YAML flavor

pub mod converters;
pub mod references;
pub mod template;

pub use references::CloudFormationReferences;
pub use template::{CfResource, CloudFormationTemplate};

use converters::{
    ApiGatewayConverter, BatchJobDefConverter, CloudFormationContext,
    CloudFormationResourceConverter, CloudWatchRuleConverter, DynamoDbTableConverter,
    IamManagedPolicyConverter, IamRoleConverter, LambdaFunctionConverter, S3BucketConverter,
    SnsTopicConverter, SqsQueueConverter,
};
use tracing::debug;

use crate::domain::entities::{BuildMeta, ResourceMeta};
use crate::domain::ports::{ResourcesProvider, TemplateTransformer};
use crate::domain::value_objects::{Flavor, TemplateSettings};
use crate::error::TransformResult;
use crate::infrastructure::shared::to_logical_id;

/// Builds one CloudFormation document per pass
pub struct CloudFormationTransformer<'a> {
    template: CloudFormationTemplate,
    settings: &'a TemplateSettings,
    resources: &'a dyn ResourcesProvider,
}

impl<'a> CloudFormationTransformer<'a> {
    pub fn new(settings: &'a TemplateSettings, resources: &'a dyn ResourcesProvider) -> Self {
        Self {
            template: CloudFormationTemplate::new(),
            settings,
            resources,
        }
    }

    pub fn template(&self) -> &CloudFormationTemplate {
        &self.template
    }

    fn convert(
        &mut self,
        converter: &dyn CloudFormationResourceConverter,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let mut ctx = CloudFormationContext {
            template: &mut self.template,
            settings: self.settings,
            resources: self.resources,
        };
        converter.convert(&mut ctx, name, resource)
    }
}

impl TemplateTransformer for CloudFormationTransformer<'_> {
    fn flavor(&self) -> Flavor {
        Flavor::CloudFormation
    }

    /// Reserve the logical id of every entry this flavor converts, so ids of
    /// generated sub-resources never take one
    fn begin_pass(&mut self, build_meta: &BuildMeta) {
        for (name, resource) in build_meta.iter() {
            let converted = resource
                .resource_type()
                .is_some_and(|resource_type| Flavor::CloudFormation.supports(resource_type));
            if converted {
                self.template.reserve(to_logical_id(name));
            }
        }
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
        _resource: &ResourceMeta,
    ) -> TransformResult<()> {
        debug!(resource = name, "dynamodb streams are not converted for CloudFormation");
        Ok(())
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
        _resource: &ResourceMeta,
    ) -> TransformResult<()> {
        debug!(resource = name, "cloudwatch alarms are not converted for CloudFormation");
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoResources;
    use serde_json::json;

    #[test]
    fn alarms_and_streams_are_no_ops() {
        let settings = TemplateSettings::default();
        let mut transformer = CloudFormationTransformer::new(&settings, &NoResources);

        let alarm = ResourceMeta::from_value(
            "errors",
            json!({"resource_type": "cloudwatch_alarm", "metric_name": "Errors"}),
        )
        .unwrap();
        let stream = ResourceMeta::from_value(
            "orders-stream",
            json!({"resource_type": "dynamodb_stream", "table_name": "orders"}),
        )
        .unwrap();

        transformer.transform_cloudwatch_alarm("errors", &alarm).unwrap();
        transformer
            .transform_dynamo_db_stream("orders-stream", &stream)
            .unwrap();

        assert!(transformer.template().is_empty());
    }

    #[test]
    fn duplicate_logical_ids_are_rejected() {
        let settings = TemplateSettings::default();
        let mut transformer = CloudFormationTransformer::new(&settings, &NoResources);
        let topic = ResourceMeta::from_value("alerts", json!({"resource_type": "sns_topic"})).unwrap();

        transformer.transform_sns_topic("alerts", &topic).unwrap();
        let err = transformer.transform_sns_topic("alerts", &topic).unwrap_err();

        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn entry_ids_are_reserved_before_conversion() {
        let settings = TemplateSettings::default();
        let mut transformer = CloudFormationTransformer::new(&settings, &NoResources);
        let build_meta = BuildMeta::from_value(json!({
            "alerts": {"resource_type": "sns_topic"},
            "alerts-policy": {"resource_type": "iam_managed_policy", "policy_content": {}},
            "errors-alarm": {"resource_type": "cloudwatch_alarm"},
        }))
        .unwrap();

        transformer.begin_pass(&build_meta);

        assert_eq!(transformer.template().free_id("AlertsPolicy"), "AlertsPolicy2");
        assert_eq!(transformer.template().free_id("ErrorsAlarm"), "ErrorsAlarm");
        assert!(transformer.template().is_empty());
    }

    #[test]
    fn compose_is_repeatable() {
        let settings = TemplateSettings::default();
        let mut transformer = CloudFormationTransformer::new(&settings, &NoResources);
        let topic = ResourceMeta::from_value("alerts", json!({"resource_type": "sns_topic"})).unwrap();
        transformer.transform_sns_topic("alerts", &topic).unwrap();

        let first = transformer.compose_template().unwrap();
        assert_eq!(first, transformer.compose_template().unwrap());
        assert!(first.contains("AWS::SNS::Topic"));
        assert_eq!(transformer.output_file_name(), "cloudformation_template.yaml");
    }
}
