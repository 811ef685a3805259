//! Batch job definition converter

use serde_json::{json, Value};

use super::{CloudFormationContext, CloudFormationResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::cloudformation::references::build_role_arn_ref;
use crate::infrastructure::cloudformation::template::CfResource;
use crate::infrastructure::shared::batch::{JobDefinitionSpec, RoleRef};
use crate::infrastructure::shared::{to_logical_id, Body};

pub const JOB_DEFINITION_TYPE: &str = "AWS::Batch::JobDefinition";

fn role_arn(role: &RoleRef) -> Value {
    match role {
        RoleRef::Named(name) => build_role_arn_ref(name),
        RoleRef::Arn(arn) => Value::String(arn.clone()),
    }
}

/// `batch_job_definition` -> `AWS::Batch::JobDefinition`
pub struct BatchJobDefConverter;

impl CloudFormationResourceConverter for BatchJobDefConverter {
    fn convert(
        &self,
        ctx: &mut CloudFormationContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = JobDefinitionSpec::parse(&resource.reader(name))?;

        let container_properties = spec.container.as_ref().map(|container| {
            Value::from(
                Body::new()
                    .with_opt("Image", container.image.as_deref())
                    .with_opt("Vcpus", container.vcpus)
                    .with_opt("Memory", container.memory)
                    .with_list("Command", container.command.clone())
                    .with_opt("JobRoleArn", container.job_role.as_ref().map(role_arn))
                    .with_opt(
                        "ExecutionRoleArn",
                        container.execution_role.as_ref().map(role_arn),
                    ),
            )
        });

        let properties = Body::new()
            .with("JobDefinitionName", name)
            .with("Type", spec.job_type.as_str())
            .with_object("Parameters", spec.parameters.clone())
            .with_object("Tags", spec.tags.clone())
            .with_opt(
                "Timeout",
                spec.attempt_duration_seconds
                    .map(|seconds| json!({"AttemptDurationSeconds": seconds})),
            )
            .with_opt(
                "RetryStrategy",
                spec.retry_attempts.map(|attempts| json!({"Attempts": attempts})),
            )
            .with_opt("ContainerProperties", container_properties);

        ctx.template.add(
            &to_logical_id(name),
            CfResource::new(JOB_DEFINITION_TYPE, properties.into_map()),
        )
    }
}
