//! DynamoDB table converter
//!
//! Stream entries are not converted in this flavor.

use serde_json::{json, Value};

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::{build_role_arn_ref, ref_to};
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::dynamodb::{AutoscalingSetting, KeySchema, TableSpec};
use crate::infrastructure::shared::{to_logical_id, Body};

pub const TABLE_TYPE: &str = "AWS::DynamoDB::Table";
pub const SCALABLE_TARGET_TYPE: &str = "AWS::ApplicationAutoScaling::ScalableTarget";
pub const SCALING_POLICY_TYPE: &str = "AWS::ApplicationAutoScaling::ScalingPolicy";

fn key_schema(keys: &KeySchema) -> Value {
    let mut schema = vec![json!({"AttributeName": keys.hash_key, "KeyType": "HASH"})];
    if let Some(range_key) = &keys.range_key {
        schema.push(json!({"AttributeName": range_key, "KeyType": "RANGE"}));
    }
    Value::Array(schema)
}

fn throughput(read: Option<i64>, write: Option<i64>) -> Option<Value> {
    match (read, write) {
        (None, None) => None,
        (read, write) => Some(json!({
            "ReadCapacityUnits": read.unwrap_or(1),
            "WriteCapacityUnits": write.unwrap_or(1)
        })),
    }
}

/// `dynamodb_table` -> `AWS::DynamoDB::Table` (+ scalable target and policy)
pub struct DynamoDbTableConverter;

impl CloudFormationResourceConverter for DynamoDbTableConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = TableSpec::parse(name, &resource.reader(name))?;
        let provisioned = spec.is_provisioned();

        let attributes: Vec<Value> = spec
            .attributes
            .iter()
            .map(|(attribute, key_type)| {
                json!({"AttributeName": attribute, "AttributeType": key_type})
            })
            .collect();

        let indexes: Vec<Value> = spec
            .global_indexes
            .iter()
            .map(|index| {
                let mut body = Body::new()
                    .with("IndexName", index.name.as_str())
                    .with("KeySchema", key_schema(&index.keys))
                    .with("Projection", json!({"ProjectionType": "ALL"}));
                if provisioned {
                    body = body.with_opt(
                        "ProvisionedThroughput",
                        throughput(index.read_capacity, index.write_capacity),
                    );
                }
                Value::from(body)
            })
            .collect();

        let mut properties = Body::new()
            .with("TableName", name)
            .with("BillingMode", spec.billing_mode.as_str())
            .with("AttributeDefinitions", attributes)
            .with("KeySchema", key_schema(&spec.keys));
        if provisioned {
            properties = properties.with_opt(
                "ProvisionedThroughput",
                throughput(spec.read_capacity, spec.write_capacity),
            );
        }
        let properties = properties.with_list("GlobalSecondaryIndexes", indexes);

        let table_id = to_logical_id(name);
        ctx.template
            .add(&table_id, CfResource::new(TABLE_TYPE, properties.into_map()))?;

        for setting in &spec.autoscaling {
            add_autoscaling(ctx, name, &table_id, setting)?;
        }
        Ok(())
    }
}

fn add_autoscaling(
    ctx: &mut CloudFormationContext<'_>,
    table: &str,
    table_id: &str,
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
    let target_id = ctx.template.free_id(&to_logical_id(&format!(
        "{} {} {} scalable target",
        table, index, dimension
    )));

    let target = Body::new()
        .with("MaxCapacity", setting.max_capacity)
        .with("MinCapacity", setting.min_capacity)
        .with("ResourceId", setting.resource_id.as_str())
        .with("ScalableDimension", setting.dimension.as_str())
        .with("ServiceNamespace", "dynamodb")
        .with_opt("RoleARN", setting.role_name.as_deref().map(build_role_arn_ref));
    ctx.template.add(
        &target_id,
        CfResource::new(SCALABLE_TARGET_TYPE, target.into_map())
            .depends_on(vec![table_id.to_string()]),
    )?;

    let Some(target_value) = setting.target_utilization.clone() else {
        return Ok(());
    };

    let configuration = Body::new()
        .with("TargetValue", target_value)
        .with(
            "PredefinedMetricSpecification",
            json!({"PredefinedMetricType": setting.predefined_metric()}),
        )
        .with_opt("ScaleInCooldown", setting.scale_in_cooldown)
        .with_opt("ScaleOutCooldown", setting.scale_out_cooldown);

    let policy_id = ctx.template.free_id(&to_logical_id(&format!(
        "{} {} {} scaling policy",
        table, index, dimension
    )));
    let policy = Body::new()
        .with(
            "PolicyName",
            setting
                .policy_name
                .clone()
                .unwrap_or_else(|| format!("{}-scaling-policy", policy_id)),
        )
        .with("PolicyType", "TargetTrackingScaling")
        .with("ScalingTargetId", ref_to(&target_id))
        .with("TargetTrackingScalingPolicyConfiguration", configuration);
    ctx.template.add(
        &policy_id,
        CfResource::new(SCALING_POLICY_TYPE, policy.into_map()),
    )
}
