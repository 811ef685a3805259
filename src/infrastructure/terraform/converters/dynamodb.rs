//! DynamoDB table and stream converters

use serde_json::{json, Value};

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::dynamodb::{stream_target, AutoscalingSetting, TableSpec};
use crate::infrastructure::shared::{tf_name, Body};
use crate::infrastructure::terraform::references::build_role_arn_ref;
use crate::infrastructure::terraform::template::TfResourceType;

/// `dynamodb_table` -> `aws_dynamodb_table` (+ autoscaling target and policy)
pub struct DynamoDbTableConverter;

impl TerraformResourceConverter for DynamoDbTableConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let spec = TableSpec::parse(name, &attrs)?;
        let provisioned = spec.is_provisioned();

        let attributes: Vec<Value> = spec
            .attributes
            .iter()
            .map(|(attribute, key_type)| json!({"name": attribute, "type": key_type}))
            .collect();

        let indexes: Vec<Value> = spec
            .global_indexes
            .iter()
            .map(|index| {
                let mut body = Body::new()
                    .with("name", index.name.as_str())
                    .with("hash_key", index.keys.hash_key.as_str())
                    .with_opt("range_key", index.keys.range_key.as_deref())
                    .with("projection_type", "ALL");
                if provisioned {
                    body = body
                        .with_opt("read_capacity", index.read_capacity)
                        .with_opt("write_capacity", index.write_capacity);
                }
                Value::from(body)
            })
            .collect();

        let mut body = Body::new()
            .with("name", name)
            .with("billing_mode", spec.billing_mode.as_str())
            .with("hash_key", spec.keys.hash_key.as_str())
            .with_opt("range_key", spec.keys.range_key.as_deref());
        if provisioned {
            body = body
                .with_opt("read_capacity", spec.read_capacity)
                .with_opt("write_capacity", spec.write_capacity);
        }
        let body = body
            .with_list("attribute", attributes)
            .with_list("global_secondary_index", indexes);

        ctx.template
            .add(TfResourceType::DynamoDbTable, name, body.into_map())?;

        for setting in &spec.autoscaling {
            add_autoscaling(ctx, name, setting)?;
        }
        Ok(())
    }
}

fn add_autoscaling(
    ctx: &mut TerraformContext<'_>,
    table: &str,
    setting: &AutoscalingSetting,
) -> TransformResult<()> {
    let dimension = setting
        .dimension
        .rsplit(':')
        .next()
        .unwrap_or(&setting.dimension);
    let index = setting
        .resource_id
        .split_once("/index/")
        .map(|(_, index)| index)
        .unwrap_or("");
    let target_name = tf_name(&[table, index, dimension]);

    let target = Body::new()
        .with("max_capacity", setting.max_capacity)
        .with("min_capacity", setting.min_capacity)
        .with("resource_id", setting.resource_id.as_str())
        .with("scalable_dimension", setting.dimension.as_str())
        .with("service_namespace", "dynamodb")
        .with_opt(
            "role_arn",
            setting.role_name.as_deref().map(build_role_arn_ref),
        )
        .with(
            "depends_on",
            json!([TfResourceType::DynamoDbTable.address(table)]),
        );
    ctx.template
        .add(TfResourceType::AppAutoscalingTarget, &target_name, target.into_map())?;

    let Some(target_value) = setting.target_utilization.clone() else {
        return Ok(());
    };
    let target_ref = |attribute: &str| {
        TfResourceType::AppAutoscalingTarget.reference(&target_name, attribute)
    };

    let configuration = Body::new()
        .with(
            "predefined_metric_specification",
            json!([{"predefined_metric_type": setting.predefined_metric()}]),
        )
        .with("target_value", target_value)
        .with_opt("scale_in_cooldown", setting.scale_in_cooldown)
        .with_opt("scale_out_cooldown", setting.scale_out_cooldown);

    let policy_name = setting
        .policy_name
        .clone()
        .unwrap_or_else(|| format!("{}-scaling-policy", target_name));
    let policy = Body::new()
        .with("name", policy_name)
        .with("policy_type", "TargetTrackingScaling")
        .with("resource_id", target_ref("resource_id"))
        .with("scalable_dimension", target_ref("scalable_dimension"))
        .with("service_namespace", target_ref("service_namespace"))
        .with(
            "target_tracking_scaling_policy_configuration",
            json!([Value::from(configuration)]),
        );
    ctx.template
        .add(TfResourceType::AppAutoscalingPolicy, &target_name, policy.into_map())
}

/// `dynamodb_stream` -> stream settings on the named table
pub struct DynamoDbStreamConverter;

impl TerraformResourceConverter for DynamoDbStreamConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);
        let (table, view_type) = stream_target(&attrs)?;
        ctx.template.add_dynamo_db_stream(table, view_type);
        Ok(())
    }
}
