//! CloudWatch event rule converter
//!
//! Metric alarms are not converted in this flavor.

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::{rule_trigger, to_logical_id, Body, RuleTrigger};

pub const RULE_TYPE: &str = "AWS::Events::Rule";

/// `cloudwatch_rule` -> `AWS::Events::Rule`
pub struct CloudWatchRuleConverter;

impl CloudFormationResourceConverter for CloudWatchRuleConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let attrs = resource.reader(name);

        let properties = Body::new()
            .with("Name", name)
            .with_opt("Description", attrs.str("description")?);
        let properties = match rule_trigger(&attrs)? {
            RuleTrigger::Schedule(expression) => properties.with("ScheduleExpression", expression),
            RuleTrigger::Pattern(pattern) => properties.with("EventPattern", pattern),
        };
        let state = match attrs.bool("enabled")? {
            Some(false) => "DISABLED",
            _ => "ENABLED",
        };
        let properties = properties.with("State", state);

        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(RULE_TYPE, properties.into_map()),
        )
    }
}
