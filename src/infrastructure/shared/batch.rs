//! Flavor-agnostic model of a `batch_job_definition` entry

use serde_json::{Map, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const DEFAULT_JOB_TYPE: &str = "container";

/// Role named in the build meta or given as a literal ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    Named(String),
    Arn(String),
}

impl RoleRef {
    fn parse(value: &str) -> Self {
        if value.starts_with("arn:") {
            RoleRef::Arn(value.to_string())
        } else {
            RoleRef::Named(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub image: Option<String>,
    pub vcpus: Option<i64>,
    pub memory: Option<i64>,
    pub command: Vec<String>,
    pub job_role: Option<RoleRef>,
    pub execution_role: Option<RoleRef>,
}

impl ContainerSpec {
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.vcpus.is_none()
            && self.memory.is_none()
            && self.command.is_empty()
            && self.job_role.is_none()
            && self.execution_role.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinitionSpec {
    pub job_type: String,
    pub parameters: Map<String, Value>,
    pub tags: Map<String, Value>,
    pub attempt_duration_seconds: Option<i64>,
    pub retry_attempts: Option<i64>,
    pub container: Option<ContainerSpec>,
}

impl JobDefinitionSpec {
    pub fn parse(attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let attempt_duration_seconds = match attrs.value("timeout") {
            Some(Value::Object(timeout)) => attrs
                .child(timeout)
                .int_any(&["attempt_duration_seconds", "attemptDurationSeconds"])?,
            Some(_) => attrs.int("timeout")?,
            None => None,
        };

        let retry_attempts = match attrs.object("retry_strategy")? {
            Some(strategy) => attrs.child(strategy).int("attempts")?,
            None => None,
        };

        let container = match attrs.object("container_properties")? {
            Some(properties) => {
                let properties = attrs.child(properties);
                let truthy_int = |key: &str| match properties.truthy(key) {
                    Some(_) => properties.int(key),
                    None => Ok(None),
                };
                Some(ContainerSpec {
                    image: properties.str("image")?.filter(|s| !s.is_empty()).map(str::to_string),
                    vcpus: truthy_int("vcpus")?,
                    memory: truthy_int("memory")?,
                    command: properties.str_list("command")?,
                    job_role: properties.str("job_role_arn")?.map(RoleRef::parse),
                    execution_role: properties.str("execution_role_arn")?.map(RoleRef::parse),
                })
            }
            None => None,
        };

        Ok(Self {
            job_type: attrs
                .str("job_definition_type")?
                .unwrap_or(DEFAULT_JOB_TYPE)
                .to_string(),
            parameters: attrs.object("parameters")?.cloned().unwrap_or_default(),
            tags: attrs.object("tags")?.cloned().unwrap_or_default(),
            attempt_duration_seconds,
            retry_attempts,
            container: container.filter(|c| !c.is_empty()),
        })
    }
}
