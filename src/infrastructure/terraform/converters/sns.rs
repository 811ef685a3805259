//! SNS topic converter

use serde_json::Value;

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::iam::policy_string;
use crate::infrastructure::shared::messaging::TopicSpec;
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::template::TfResourceType;

/// `sns_topic` -> `aws_sns_topic`
pub struct SnsTopicConverter;

impl TerraformResourceConverter for SnsTopicConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = TopicSpec::parse(name, &resource.reader(name))?;

        let policy = match &spec.policy {
            Some(document) => Some(policy_string(&Value::Object(document.clone()))?),
            None => None,
        };

        let mut body = Body::new()
            .with("name", spec.name.as_str())
            .with_opt("display_name", spec.display_name.as_deref());
        if spec.fifo {
            body = body.with("fifo_topic", true);
        }
        let body = body
            .with_opt("kms_master_key_id", spec.kms_master_key_id.as_deref())
            .with_opt("policy", policy);

        ctx.template.add(TfResourceType::SnsTopic, name, body.into_map())?;
        Ok(())
    }
}
