//! CloudWatch event rule and metric alarm converters

use serde_json::Value;

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::iam::policy_string;
use crate::infrastructure::shared::{rule_trigger, Body, RuleTrigger};
use crate::infrastructure::terraform::references::build_sns_topic_arn_ref;
use crate::infrastructure::terraform::template::TfResourceType;

/// `cloudwatch_rule` -> `aws_cloudwatch_event_rule`
pub struct CloudWatchRuleConverter;

impl TerraformResourceConverter for CloudWatchRuleConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);

        let body = Body::new()
            .with("name", name)
            .with_opt("description", attrs.str("description")?);
        let body = match rule_trigger(&attrs)? {
            RuleTrigger::Schedule(expression) => body.with("schedule_expression", expression),
            RuleTrigger::Pattern(pattern) => body.with("event_pattern", policy_string(&pattern)?),
        };
        let body = body.with_opt("is_enabled", attrs.bool("enabled")?);

        ctx.template
            .add(TfResourceType::CloudWatchEventRule, name, body.into_map())?;
        Ok(())
    }
}

/// `cloudwatch_alarm` -> `aws_cloudwatch_metric_alarm`
///
/// Every optional field is emitted only when its own value is truthy.
pub struct CloudWatchAlarmConverter;

impl TerraformResourceConverter for CloudWatchAlarmConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);

        let int_if_truthy = |key: &str| -> TransformResult<Option<i64>> {
            match attrs.truthy(key) {
                Some(_) => attrs.int(key),
                None => Ok(None),
            }
        };

        let alarm_actions: Vec<Value> = attrs
            .str_list("sns_topics")?
            .iter()
            .map(|topic| Value::String(build_sns_topic_arn_ref(topic)))
            .collect();

        let body = Body::new()
            .with("alarm_name", name)
            .with_opt("comparison_operator", attrs.truthy("comparison_operator").cloned())
            .with_opt("evaluation_periods", int_if_truthy("evaluation_periods")?)
            .with_opt("metric_name", attrs.truthy("metric_name").cloned())
            .with_opt("namespace", attrs.truthy("namespace").cloned())
            .with_opt("period", int_if_truthy("period")?)
            .with_opt("statistic", attrs.truthy("statistic").cloned())
            .with_opt("threshold", attrs.truthy("threshold").cloned())
            .with_list("alarm_actions", alarm_actions);

        ctx.template
            .add(TfResourceType::CloudWatchMetricAlarm, name, body.into_map())?;
        Ok(())
    }
}
