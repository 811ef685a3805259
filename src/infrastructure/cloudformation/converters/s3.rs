//! S3 bucket converter

use serde_json::{json, Value};

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::ref_to;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::s3::{access_control, BucketSpec};
use crate::infrastructure::shared::{to_logical_id, Body};

pub const BUCKET_TYPE: &str = "AWS::S3::Bucket";
pub const BUCKET_POLICY_TYPE: &str = "AWS::S3::BucketPolicy";

/// `s3_bucket` -> `AWS::S3::Bucket` (+ `AWS::S3::BucketPolicy`)
pub struct S3BucketConverter;

impl CloudFormationResourceConverter for S3BucketConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = BucketSpec::parse(&resource.reader(name))?;

        let cors_rules: Vec<Value> = spec
            .cors_rules
            .iter()
            .map(|rule| {
                Value::from(
                    Body::new()
                        .with_list("AllowedHeaders", rule.allowed_headers.clone())
                        .with("AllowedMethods", rule.allowed_methods.clone())
                        .with("AllowedOrigins", rule.allowed_origins.clone())
                        .with_list("ExposedHeaders", rule.exposed_headers.clone())
                        .with_opt("MaxAge", rule.max_age),
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
                    .map(|t| json!({"TransitionInDays": t.days, "StorageClass": t.storage_class}))
                    .collect();
                let body = Body::new()
                    .with("Id", rule.id.as_str())
                    .with("Prefix", rule.prefix.as_str())
                    .with("Status", if rule.enabled { "Enabled" } else { "Disabled" })
                    .with_opt("ExpirationInDays", rule.expiration_days)
                    .with_list("Transitions", transitions);
                Value::from(body)
            })
            .collect();

        let mut properties = Body::new()
            .with("BucketName", name)
            .with_opt("AccessControl", spec.acl.as_deref().map(access_control));
        if !cors_rules.is_empty() {
            properties.insert("CorsConfiguration", json!({"CorsRules": cors_rules}));
        }
        if !lifecycle_rules.is_empty() {
            properties.insert("LifecycleConfiguration", json!({"Rules": lifecycle_rules}));
        }

        let bucket_id = to_logical_id(name);
        ctx.template.add(
            &bucket_id,
            CfResource::new(BUCKET_TYPE, properties.into_map()),
        )?;

        if let Some(document) = spec.policy {
            let policy = Body::new()
                .with("Bucket", ref_to(&bucket_id))
                .with("PolicyDocument", Value::Object(document));
            let policy_id = ctx.template.free_id(&format!("{}Policy", bucket_id));
            ctx.template.add(
                &policy_id,
                CfResource::new(BUCKET_POLICY_TYPE, policy.into_map()),
            )?;
        }
        Ok(())
    }
}
