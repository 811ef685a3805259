//! SNS topic converter

use serde_json::Value;

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::ref_to;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::messaging::TopicSpec;
use crate::infrastructure::shared::{to_logical_id, Body};

pub const TOPIC_TYPE: &str = "AWS::SNS::Topic";
pub const TOPIC_POLICY_TYPE: &str = "AWS::SNS::TopicPolicy";

/// `sns_topic` -> `AWS::SNS::Topic` (+ `AWS::SNS::TopicPolicy`)
pub struct SnsTopicConverter;

impl CloudFormationResourceConverter for SnsTopicConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = TopicSpec::parse(name, &resource.reader(name))?;

        let mut properties = Body::new()
            .with("TopicName", spec.name.as_str())
            .with_opt("DisplayName", spec.display_name.as_deref());
        if spec.fifo {
            properties = properties.with("FifoTopic", true);
        }
        let properties =
            properties.with_opt("KmsMasterKeyId", spec.kms_master_key_id.as_deref());

        let topic_id = to_logical_id(name);
        ctx.template
            .add(&topic_id, CfResource::new(TOPIC_TYPE, properties.into_map()))?;

        if let Some(document) = spec.policy {
            let policy = Body::new()
                .with("Topics", vec![ref_to(&topic_id)])
                .with("PolicyDocument", Value::Object(document));
            let policy_id = ctx.template.free_id(&format!("{}Policy", topic_id));
            ctx.template.add(
                &policy_id,
                CfResource::new(TOPIC_POLICY_TYPE, policy.into_map()),
            )?;
        }
        Ok(())
    }
}
