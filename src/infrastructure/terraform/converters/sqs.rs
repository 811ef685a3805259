//! SQS queue converter

use serde_json::{json, Value};

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::iam::policy_string;
use crate::infrastructure::shared::messaging::{DeadLetterTarget, QueueSpec};
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::references::build_sqs_queue_arn_ref;
use crate::infrastructure::terraform::template::TfResourceType;

/// `sqs_queue` -> `aws_sqs_queue`
pub struct SqsQueueConverter;

impl TerraformResourceConverter for SqsQueueConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = QueueSpec::parse(name, &resource.reader(name))?;

        let policy = match &spec.policy {
            Some(document) => Some(policy_string(&Value::Object(document.clone()))?),
            None => None,
        };

        let redrive_policy = match &spec.redrive_policy {
            Some(redrive) => {
                let target = match &redrive.target {
                    DeadLetterTarget::Queue(queue) => build_sqs_queue_arn_ref(queue),
                    DeadLetterTarget::Arn(arn) => arn.clone(),
                };
                Some(policy_string(&json!({
                    "deadLetterTargetArn": target,
                    "maxReceiveCount": redrive.max_receive_count
                }))?)
            }
            None => None,
        };

        let mut body = Body::new().with("name", spec.name.as_str());
        if spec.fifo {
            body = body.with("fifo_queue", true);
        }
        let body = body
            .with_opt("visibility_timeout_seconds", spec.visibility_timeout)
            .with_opt("delay_seconds", spec.delay_seconds)
            .with_opt("max_message_size", spec.maximum_message_size)
            .with_opt("message_retention_seconds", spec.message_retention_period)
            .with_opt(
                "receive_wait_time_seconds",
                spec.receive_message_wait_time_seconds,
            )
            .with_opt(
                "content_based_deduplication",
                spec.content_based_deduplication,
            )
            .with_opt("kms_master_key_id", spec.kms_master_key_id.as_deref())
            .with_opt("policy", policy)
            .with_opt("redrive_policy", redrive_policy);

        ctx.template.add(TfResourceType::SqsQueue, name, body.into_map())?;
        Ok(())
    }
}
