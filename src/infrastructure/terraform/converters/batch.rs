//! Batch job definition converter

use serde_json::{json, Value};

use super::{TerraformContext, TerraformResourceConverter};
use crate::domain::entities::ResourceMeta;
use crate::error::TransformResult;
use crate::infrastructure::shared::batch::{JobDefinitionSpec, RoleRef};
use crate::infrastructure::shared::iam::policy_string;
use crate::infrastructure::shared::Body;
use crate::infrastructure::terraform::references::build_role_arn_ref;
use crate::infrastructure::terraform::template::TfResourceType;

fn role_arn(role: &RoleRef) -> String {
    match role {
        RoleRef::Named(name) => build_role_arn_ref(name),
        RoleRef::Arn(arn) => arn.clone(),
    }
}

/// `batch_job_definition` -> `aws_batch_job_definition`
///
/// `container_properties` is embedded as a compact JSON string.
pub struct BatchJobDefConverter;

impl TerraformResourceConverter for BatchJobDefConverter {
    fn convert(
        &self,
        ctx: &mut TerraformContext<'_>,
        name: &str,
        resource: &ResourceMeta,
    ) -> TransformResult<()> {
        let spec = JobDefinitionSpec::parse(&resource.reader(name))?;

        let container_properties = match &spec.container {
            Some(container) => {
                let properties = Body::new()
                    .with_opt("image", container.image.as_deref())
                    .with_opt("vcpus", container.vcpus)
                    .with_opt("memory", container.memory)
                    .with_list("command", container.command.clone())
                    .with_opt("jobRoleArn", container.job_role.as_ref().map(role_arn))
                    .with_opt(
                        "executionRoleArn",
                        container.execution_role.as_ref().map(role_arn),
                    );
                Some(policy_string(&Value::from(properties))?)
            }
            None => None,
        };

        let body = Body::new()
            .with("name", name)
            .with("type", spec.job_type.as_str())
            .with_object("parameters", spec.parameters.clone())
            .with_object("tags", spec.tags.clone())
            .with_opt(
                "timeout",
                spec.attempt_duration_seconds
                    .map(|seconds| json!([{"attempt_duration_seconds": seconds}])),
            )
            .with_opt(
                "retry_strategy",
                spec.retry_attempts
                    .map(|attempts| json!([{"attempts": attempts}])),
            )
            .with_opt("container_properties", container_properties);

        ctx.template
            .add(TfResourceType::BatchJobDefinition, name, body.into_map())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::terraform::converters::test_support::convert;

    #[test]
    fn container_properties_are_compacted_with_role_reference() {
        let template = convert(
            &BatchJobDefConverter,
            "nightly-report",
            json!({
                "resource_type": "batch_job_definition",
                "job_definition_type": "container",
                "container_properties": {
                    "image": "reports:latest",
                    "vcpus": 2,
                    "memory": 2048,
                    "command": ["run", "--all"],
                    "job_role_arn": "batch-job-role"
                },
                "retry_strategy": {"attempts": 3}
            }),
        )
        .unwrap();

        let job = template
            .get(TfResourceType::BatchJobDefinition, "nightly-report")
            .unwrap();
        assert_eq!(job["type"], "container");
        assert_eq!(
            job["container_properties"],
            r#"{"image":"reports:latest","vcpus":2,"memory":2048,"command":["run","--all"],"jobRoleArn":"${aws_iam_role.batch-job-role.arn}"}"#
        );
        assert_eq!(job["retry_strategy"], json!([{"attempts": 3}]));
        assert!(!job.contains_key("parameters"));
    }

    #[test]
    fn job_without_container_has_no_properties() {
        let template = convert(
            &BatchJobDefConverter,
            "bare",
            json!({"resource_type": "batch_job_definition", "parameters": {"mode": "full"}}),
        )
        .unwrap();

        let job = template.get(TfResourceType::BatchJobDefinition, "bare").unwrap();
        assert!(!job.contains_key("container_properties"));
        assert_eq!(job["parameters"], json!({"mode": "full"}));
    }
}
