//! S3 bucket converter

use serde_json::{json, Value};

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::iam::policy_string;
use crate::infrastructure::shared::s3::BucketSpec;
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::template::TfResourceType;

/// `s3_bucket` -> `aws_s3_bucket`
pub struct S3BucketConverter;

impl TerraformResourceConverter for S3BucketConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = BucketSpec::parse(&resource.reader(name))?;

        let policy = match &spec.policy {
            Some(document) => Some(policy_string(&Value::Object(document.clone()))?),
            None => None,
        };

        let cors_rules: Vec<Value> = spec
            .cors_rules
            .iter()
            .map(|rule| {
                Value::from(
                    Body::new()
                        .with("allowed_headers", rule.allowed_headers.clone())
                        .with("allowed_methods", rule.allowed_methods.clone())
                        .with("allowed_origins", rule.allowed_origins.clone())
                        .with("expose_headers", rule.exposed_headers.clone())
                        .with_opt("max_age_seconds", rule.max_age),
                )
            })
            .collect();

        let lifecycle_rules: Vec<Value> = spec
            .lifecycle_rules
            .iter()
            .map(|rule| {
                let transitions: Vec<Value> = rule
                    .transitions
                    .iter()
                    .map(|t| json!({"days": t.days, "storage_class": t.storage_class}))
                    .collect();
                let body = Body::new()
                    .with("id", rule.id.as_str())
                    .with("prefix", rule.prefix.as_str())
                    .with("enabled", rule.enabled)
                    .with_opt(
                        "expiration",
                        rule.expiration_days.map(|days| json!({"days": days})),
                    )
                    .with("transition", transitions);
                Value::from(body)
            })
            .collect();

        let body = Body::new()
            .with_opt("acl", spec.acl.as_deref())
            .with("bucket", name)
            .with_opt("policy", policy)
            .with_list("cors_rule", cors_rules)
            .with_list("lifecycle_rule", lifecycle_rules);

        ctx.template
            .add(TfResourceType::S3Bucket, name, body.into_map())?;
        Ok(())
    }
}
