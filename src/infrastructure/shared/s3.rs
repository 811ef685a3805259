//! Flavor-agnostic model of an `s3_bucket` entry

use serde_json::{Map, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const ENABLED_STATUS: &str = "Enabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub days: i64,
    pub storage_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRule {
    pub id: String,
    /// Empty when the rule has no `Prefix`
    pub prefix: String,
    pub enabled: bool,
    pub expiration_days: Option<i64>,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsRule {
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub max_age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketSpec {
    pub acl: Option<String>,
    pub policy: Option<Map<String, Value>>,
    pub lifecycle_rules: Vec<LifecycleRule>,
    pub cors_rules: Vec<CorsRule>,
}

impl BucketSpec {
    pub fn parse(attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let mut lifecycle_rules = Vec::new();
        if let Some(document) = attrs.object("LifecycleConfiguration")? {
            for rule in attrs.child(document).objects("Rules")? {
                lifecycle_rules.push(lifecycle_rule(&rule)?);
            }
        }

        let mut cors_rules = Vec::new();
        for rule in attrs.objects("cors")? {
            cors_rules.push(CorsRule {
                allowed_headers: rule.str_list("AllowedHeaders")?,
                allowed_methods: required_str_list(&rule, "AllowedMethods")?,
                allowed_origins: required_str_list(&rule, "AllowedOrigins")?,
                exposed_headers: rule.str_list("ExposedHeaders")?,
                max_age: rule.int("MaxAge")?,
            });
        }

        Ok(Self {
            acl: attrs.str("acl")?.map(str::to_string),
            policy: attrs.object("policy")?.filter(|p| !p.is_empty()).cloned(),
            lifecycle_rules,
            cors_rules,
        })
    }
}

fn lifecycle_rule(rule: &AttributeReader<'_>) -> TransformResult<LifecycleRule> {
    let expiration_days = match rule.object("Expiration")? {
        Some(expiration) => Some(rule.child(expiration).required_int("Days")?),
        None => None,
    };

    let mut transitions = Vec::new();
    for transition in rule.objects("Transitions")? {
        transitions.push(Transition {
            days: transition.required_int("Days")?,
            storage_class: transition.required_str("StorageClass")?.to_string(),
        });
    }

    Ok(LifecycleRule {
        id: rule.required_str("ID")?.to_string(),
        prefix: rule.str("Prefix")?.unwrap_or_default().to_string(),
        enabled: rule.required_str("Status")? == ENABLED_STATUS,
        expiration_days,
        transitions,
    })
}

fn required_str_list(attrs: &AttributeReader<'_>, key: &str) -> TransformResult<Vec<String>> {
    let items = attrs.str_list(key)?;
    if items.is_empty() {
        return Err(attrs.missing(key));
    }
    Ok(items)
}

/// CloudFormation `AccessControl` value for a canned ACL (`public-read` -> `PublicRead`)
pub fn access_control(acl: &str) -> String {
    acl.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
