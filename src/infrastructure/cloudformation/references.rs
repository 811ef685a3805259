//! CloudFormation reference expressions
//!
//! Resources address each other through intrinsic functions keyed by the
//! logical id derived from the resource name: `Ref`, `Fn::GetAtt` and, for
//! composed ARNs, `Fn::Sub`.

use serde_json::{json, Value};

use crate::domain::ports::ReferenceBuilder;
use crate::domain::value_objects::{Attribute, ResourceKind};
use crate::infrastructure::shared::to_logical_id;

/// `{"Ref": id}`
pub fn ref_to(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: impl Into<String>) -> Value {
    json!({ "Fn::Sub": template.into() })
}

/// Whether `Ref` on this kind already yields its ARN
fn ref_returns_arn(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::SnsTopic
            | ResourceKind::IamPolicy
            | ResourceKind::LambdaLayer
            | ResourceKind::BatchJobDefinition
    )
}

/// Execution ARN of the rest API `api_name`, followed by `suffix`
pub fn execute_api_arn(api_name: &str, suffix: &str) -> Value {
    sub(format!(
        "arn:${{AWS::Partition}}:execute-api:${{AWS::Region}}:${{AWS::AccountId}}:${{{}}}{}",
        to_logical_id(api_name),
        suffix
    ))
}

pub fn build_role_arn_ref(role_name: &str) -> Value {
    CloudFormationReferences.build_reference(role_name, ResourceKind::IamRole)
}

/// Stateless CloudFormation reference builder
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFormationReferences;

impl ReferenceBuilder for CloudFormationReferences {
    fn attribute_reference(&self, name: &str, kind: ResourceKind, attribute: Attribute) -> Value {
        let id = to_logical_id(name);
        match attribute {
            Attribute::Arn => match kind {
                kind if ref_returns_arn(kind) => ref_to(&id),
                ResourceKind::ApiGatewayRestApi => {
                    sub(format!("arn:${{AWS::Partition}}:apigateway:${{AWS::Region}}::/restapis/${{{}}}", id))
                }
                ResourceKind::ApiGatewayResource | ResourceKind::ApiGatewayDeployment => {
                    ref_to(&id)
                }
                _ => get_att(&id, "Arn"),
            },
            Attribute::Name => match kind {
                ResourceKind::SnsTopic => get_att(&id, "TopicName"),
                ResourceKind::SqsQueue => get_att(&id, "QueueName"),
                _ => ref_to(&id),
            },
            Attribute::Id => ref_to(&id),
            Attribute::RootResourceId => get_att(&id, "RootResourceId"),
            Attribute::InvokeArn => sub(format!(
                "arn:${{AWS::Partition}}:apigateway:${{AWS::Region}}:lambda:path/2015-03-31/functions/${{{}.Arn}}/invocations",
                id
            )),
            Attribute::ExecutionArn => execute_api_arn(name, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_arn_uses_get_att_on_logical_id() {
        assert_eq!(
            build_role_arn_ref("lambda-role"),
            json!({"Fn::GetAtt": ["LambdaRole", "Arn"]})
        );
    }

    #[test]
    fn topic_arn_is_a_ref() {
        assert_eq!(
            CloudFormationReferences.build_reference("alerts", ResourceKind::SnsTopic),
            json!({"Ref": "Alerts"})
        );
    }

    #[test]
    fn queue_name_uses_get_att() {
        assert_eq!(
            CloudFormationReferences.attribute_reference(
                "jobs-dlq",
                ResourceKind::SqsQueue,
                Attribute::Name
            ),
            json!({"Fn::GetAtt": ["JobsDlq", "QueueName"]})
        );
    }

    #[test]
    fn invoke_arn_is_composed_with_sub() {
        assert_eq!(
            CloudFormationReferences.attribute_reference(
                "create-order",
                ResourceKind::LambdaFunction,
                Attribute::InvokeArn
            ),
            json!({"Fn::Sub": "arn:${AWS::Partition}:apigateway:${AWS::Region}:lambda:path/2015-03-31/functions/${CreateOrder.Arn}/invocations"})
        );
    }
}
