//! SQS queue converter

use serde_json::{json, Value};

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::ResourceKind;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::{ref_to, CloudFormationReferences};
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::messaging::{DeadLetterTarget, QueueSpec};
use crate::infrastructure::shared::{to_logical_id, Body};

pub const QUEUE_TYPE: &str = "AWS::SQS::Queue";
pub const QUEUE_POLICY_TYPE: &str = "AWS::SQS::QueuePolicy";

/// `sqs_queue` -> `AWS::SQS::Queue` (+ `AWS::SQS::QueuePolicy`)
pub struct SqsQueueConverter;

impl CloudFormationResourceConverter for SqsQueueConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = QueueSpec::parse(name, &resource.reader(name))?;

        let redrive_policy = spec.redrive_policy.as_ref().map(|redrive| {
            let target = match &redrive.target {
                DeadLetterTarget::Queue(queue) => {
                    CloudFormationReferences.build_reference(queue, ResourceKind::SqsQueue)
                }
                DeadLetterTarget::Arn(arn) => Value::String(arn.clone()),
            };
            json!({"deadLetterTargetArn": target, "maxReceiveCount": redrive.max_receive_count})
        });

        let mut properties = Body::new().with("QueueName", spec.name.as_str());
        if spec.fifo {
            properties = properties.with("FifoQueue", true);
        }
        let properties = properties
            .with_opt("VisibilityTimeout", spec.visibility_timeout)
            .with_opt("DelaySeconds", spec.delay_seconds)
            .with_opt("MaximumMessageSize", spec.maximum_message_size)
            .with_opt("MessageRetentionPeriod", spec.message_retention_period)
            .with_opt(
                "ReceiveMessageWaitTimeSeconds",
                spec.receive_message_wait_time_seconds,
            )
            .with_opt(
                "ContentBasedDeduplication",
                spec.content_based_deduplication,
            )
            .with_opt("KmsMasterKeyId", spec.kms_master_key_id.as_deref())
            .with_opt("RedrivePolicy", redrive_policy);

        let queue_id = to_logical_id(name);
        ctx.template
            .add(&queue_id, CfResource::new(QUEUE_TYPE, properties.into_map()))?;

        if let Some(document) = spec.policy {
            let policy = Body::new()
                .with("Queues", vec![ref_to(&queue_id)])
                .with("PolicyDocument", Value::Object(document));
            let policy_id = ctx.template.free_id(&format!("{}Policy", queue_id));
            ctx.template.add(
                &policy_id,
                CfResource::new(QUEUE_POLICY_TYPE, policy.into_map()),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cloudformation::converters::test_support::convert;

    #[test]
    fn redrive_policy_uses_get_att() {
        let template = convert(
            &SqsQueueConverter,
            "jobs",
            json!({
                "resource_type": "sqs_queue",
                "visibility_timeout": 30,
                "redrive_policy": {"deadLetterTargetArn": "jobs-dlq", "maxReceiveCount": 3}
            }),
        )
        .unwrap();

        let queue = template.get("Jobs").unwrap();
        assert_eq!(queue.properties["VisibilityTimeout"], 30);
        assert_eq!(
            queue.properties["RedrivePolicy"],
            json!({
                "deadLetterTargetArn": {"Fn::GetAtt": ["JobsDlq", "Arn"]},
                "maxReceiveCount": 3
            })
        );
        assert!(!template.contains("JobsPolicy"));
    }
}
