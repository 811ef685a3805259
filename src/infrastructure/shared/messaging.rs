//! SNS topic and SQS queue entries

use serde_json::{Map, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const FIFO_SUFFIX: &str = ".fifo";

/// Physical name, with the `.fifo` suffix FIFO topics and queues require
pub fn physical_name(name: &str, fifo: bool) -> String {
    if fifo && !name.ends_with(FIFO_SUFFIX) {
        format!("{}{}", name, FIFO_SUFFIX)
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicSpec {
    pub name: String,
    pub display_name: Option<String>,
    pub fifo: bool,
    pub kms_master_key_id: Option<String>,
    pub policy: Option<Map<String, Value>>,
}

impl TopicSpec {
    pub fn parse(name: &str, attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let fifo = attrs.flag("fifo")?;
        Ok(Self {
            name: physical_name(name, fifo),
            display_name: attrs.str("display_name")?.map(str::to_string),
            fifo,
            kms_master_key_id: attrs.str("kms_master_key_id")?.map(str::to_string),
            policy: attrs.object("policy")?.filter(|p| !p.is_empty()).cloned(),
        })
    }
}

/// Dead-letter target of a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadLetterTarget {
    /// Queue defined by name, resolved through the reference builder
    Queue(String),
    /// Literal ARN of an existing queue
    Arn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrivePolicy {
    pub target: DeadLetterTarget,
    pub max_receive_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueSpec {
    pub name: String,
    pub fifo: bool,
    pub visibility_timeout: Option<i64>,
    pub delay_seconds: Option<i64>,
    pub maximum_message_size: Option<i64>,
    pub message_retention_period: Option<i64>,
    pub receive_message_wait_time_seconds: Option<i64>,
    pub content_based_deduplication: Option<bool>,
    pub kms_master_key_id: Option<String>,
    pub policy: Option<Map<String, Value>>,
    pub redrive_policy: Option<RedrivePolicy>,
}

impl QueueSpec {
    pub fn parse(name: &str, attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let fifo = attrs.flag("fifo_queue")?;

        let redrive_policy = match attrs.object("redrive_policy")? {
            Some(redrive) => {
                let redrive = attrs.child(redrive);
                let target = redrive.required_str("deadLetterTargetArn")?;
                Some(RedrivePolicy {
                    target: if target.starts_with("arn:") {
                        DeadLetterTarget::Arn(target.to_string())
                    } else {
                        DeadLetterTarget::Queue(target.to_string())
                    },
                    max_receive_count: redrive.required_int("maxReceiveCount")?,
                })
            }
            None => None,
        };

        Ok(Self {
            name: physical_name(name, fifo),
            fifo,
            visibility_timeout: attrs.int("visibility_timeout")?,
            delay_seconds: attrs.int("delay_seconds")?,
            maximum_message_size: attrs.int("maximum_message_size")?,
            message_retention_period: attrs.int("message_retention_period")?,
            receive_message_wait_time_seconds: attrs.int("receive_message_wait_time_seconds")?,
            content_based_deduplication: attrs.bool("content_based_deduplication")?,
            kms_master_key_id: attrs.str("kms_master_key_id")?.map(str::to_string),
            policy: attrs.object("policy")?.filter(|p| !p.is_empty()).cloned(),
            redrive_policy,
        })
    }
}
