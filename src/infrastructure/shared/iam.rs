//! IAM documents shared by every flavor

use serde_json::{json, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const POLICY_VERSION: &str = "2012-10-17";

/// `lambda` -> `lambda.amazonaws.com`; fully qualified principals pass through
pub fn service_principal(service: &str) -> String {
    if service.contains('.') {
        service.to_string()
    } else {
        format!("{}.amazonaws.com", service)
    }
}

/// AWS managed policy ARN for a bare policy name
pub fn aws_managed_policy_arn(policy: &str) -> String {
    if policy.starts_with("arn:") {
        policy.to_string()
    } else {
        format!("arn:aws:iam::aws:policy/{}", policy)
    }
}

fn account_principal(account: &str) -> String {
    if account.starts_with("arn:") {
        account.to_string()
    } else {
        format!("arn:aws:iam::{}:root", account)
    }
}

fn one_or_many(mut values: Vec<String>) -> Value {
    if values.len() == 1 {
        Value::String(values.remove(0))
    } else {
        json!(values)
    }
}

/// Trust policy of a role.
///
/// An explicit `trusted_relationships` document wins. Otherwise statements
/// are built from `principal_service`, `allowed_accounts` and `external_id`;
/// a role with none of them is malformed.
pub fn assume_role_policy(attrs: &AttributeReader<'_>) -> TransformResult<Value> {
    if let Some(document) = attrs.object("trusted_relationships")? {
        return Ok(Value::Object(document.clone()));
    }

    let services: Vec<String> = attrs
        .str_list("principal_service")?
        .iter()
        .map(|s| service_principal(s))
        .collect();
    let accounts: Vec<String> = attrs
        .str_list("allowed_accounts")?
        .iter()
        .map(|a| account_principal(a))
        .collect();
    let external_id = attrs.str("external_id")?;

    let mut statements = Vec::new();
    if !services.is_empty() {
        statements.push(json!({
            "Effect": "Allow",
            "Principal": {"Service": one_or_many(services)},
            "Action": "sts:AssumeRole"
        }));
    }
    if !accounts.is_empty() {
        let mut statement = json!({
            "Effect": "Allow",
            "Principal": {"AWS": one_or_many(accounts)},
            "Action": "sts:AssumeRole"
        });
        if let Some(external_id) = external_id {
            statement["Condition"] = json!({"StringEquals": {"sts:ExternalId": external_id}});
        }
        statements.push(statement);
    }

    if statements.is_empty() {
        return Err(attrs.missing("principal_service"));
    }

    Ok(json!({"Version": POLICY_VERSION, "Statement": statements}))
}

/// Compact string form of a policy document; strings pass through
pub fn policy_string(document: &Value) -> TransformResult<String> {
    match document {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn service_principal_expands_short_names() {
        assert_eq!(service_principal("lambda"), "lambda.amazonaws.com");
        assert_eq!(service_principal("states.amazonaws.com"), "states.amazonaws.com");
    }

    #[test]
    fn managed_policy_arn() {
        assert_eq!(
            aws_managed_policy_arn("AWSLambdaBasicExecutionRole"),
            "arn:aws:iam::aws:policy/AWSLambdaBasicExecutionRole"
        );
        assert_eq!(
            aws_managed_policy_arn("arn:aws:iam::aws:policy/service-role/X"),
            "arn:aws:iam::aws:policy/service-role/X"
        );
    }

    #[test]
    fn trust_policy_for_single_service() {
        let map = attrs(json!({"principal_service": "lambda"}));
        let reader = AttributeReader::new("role", "iam_role", &map);

        let policy = assume_role_policy(&reader).unwrap();
        assert_eq!(
            policy,
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": {"Service": "lambda.amazonaws.com"},
                    "Action": "sts:AssumeRole"
                }]
            })
        );
    }

    #[test]
    fn trust_policy_for_accounts_with_external_id() {
        let map = attrs(json!({"allowed_accounts": ["123456789012"], "external_id": "xyz"}));
        let reader = AttributeReader::new("role", "iam_role", &map);

        let policy = assume_role_policy(&reader).unwrap();
        let statement = &policy["Statement"][0];
        assert_eq!(statement["Principal"]["AWS"], "arn:aws:iam::123456789012:root");
        assert_eq!(
            statement["Condition"]["StringEquals"]["sts:ExternalId"],
            "xyz"
        );
    }

    #[test]
    fn trust_policy_requires_a_principal() {
        let map = attrs(json!({"predefined_policies": ["ReadOnlyAccess"]}));
        let reader = AttributeReader::new("role", "iam_role", &map);

        let err = assume_role_policy(&reader).unwrap_err();
        assert!(err.to_string().contains("principal_service"));
    }

    #[test]
    fn policy_string_is_compact() {
        let doc = json!({"Version": "2012-10-17", "Statement": []});
        assert_eq!(
            policy_string(&doc).unwrap(),
            r#"{"Version":"2012-10-17","Statement":[]}"#
        );
    }
}
