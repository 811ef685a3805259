//! CloudWatch (EventBridge) rule triggers

use serde_json::{json, Map, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

/// What fires a rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleTrigger {
    /// `rate(...)` or `cron(...)` expression
    Schedule(String),
    /// Event pattern document
    Pattern(Value),
}

/// Read `rule_type` and the attributes that type needs
pub fn rule_trigger(attrs: &AttributeReader<'_>) -> TransformResult<RuleTrigger> {
    let rule_type = attrs.required_str("rule_type")?;
    match rule_type {
        "schedule" => Ok(RuleTrigger::Schedule(
            attrs.required_str("expression")?.to_string(),
        )),
        "ec2" => {
            let mut detail = Map::new();
            let states = attrs.str_list("instance_states")?;
            if !states.is_empty() {
                detail.insert("state".to_string(), json!(states));
            }
            let instances = attrs.str_list("instance_ids")?;
            if !instances.is_empty() {
                detail.insert("instance-id".to_string(), json!(instances));
            }

            let mut pattern = json!({
                "source": ["aws.ec2"],
                "detail-type": ["EC2 Instance State-change Notification"]
            });
            if !detail.is_empty() {
                pattern["detail"] = Value::Object(detail);
            }
            Ok(RuleTrigger::Pattern(pattern))
        }
        "api_call" => {
            let service = attrs.required_str("aws_service")?;
            let mut detail = json!({"eventSource": [format!("{}.amazonaws.com", service)]});
            let operations = attrs.str_list("operations")?;
            if !operations.is_empty() {
                detail["eventName"] = json!(operations);
            }
            Ok(RuleTrigger::Pattern(json!({
                "source": [format!("aws.{}", service)],
                "detail-type": ["AWS API Call via CloudTrail"],
                "detail": detail
            })))
        }
        "custom" => Ok(RuleTrigger::Pattern(Value::Object(
            attrs.required_object("custom_pattern")?.clone(),
        ))),
        other => Err(attrs.invalid(
            "rule_type",
            format!(
                "unknown rule type '{}' (expected schedule, ec2, api_call or custom)",
                other
            ),
        )),
    }
}
