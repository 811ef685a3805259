//! End-to-end CloudFormation transformations

mod common;

use common::{build_meta, fixture};
use metaform::{BuildMetaTransformer, Flavor, NoResources, TemplateSettings, TransformError};
use serde_json::{json, Value};

fn cloudformation(meta: &metaform::BuildMeta) -> Value {
    let settings = TemplateSettings::default();
    let document = BuildMetaTransformer::new(Flavor::CloudFormation, &settings, &NoResources)
        .transform(meta)
        .unwrap();
    serde_yaml_ng::from_str(&document).unwrap()
}

#[test]
fn document_header_and_resource_types() {
    let document = cloudformation(&fixture());

    assert_eq!(document["AWSTemplateFormatVersion"], "2010-09-09");
    let resources = document["Resources"].as_object().unwrap();
    for (logical_id, resource_type) in [
        ("OrdersRead", "AWS::IAM::ManagedPolicy"),
        ("OrdersHandlerRole", "AWS::IAM::Role"),
        ("OrdersHandler", "AWS::Lambda::Function"),
        ("Orders", "AWS::DynamoDB::Table"),
        ("OrderFiles", "AWS::S3::Bucket"),
        ("OrderEvents", "AWS::SNS::Topic"),
        ("OrderJobs", "AWS::SQS::Queue"),
        ("OrdersApi", "AWS::ApiGateway::RestApi"),
        ("OrdersApiOrdersPostMethod", "AWS::ApiGateway::Method"),
        ("OrdersApiDeployment", "AWS::ApiGateway::Deployment"),
        ("Nightly", "AWS::Events::Rule"),
        ("OrderReport", "AWS::Batch::JobDefinition"),
    ] {
        assert_eq!(
            resources.get(logical_id).map(|r| &r["Type"]),
            Some(&json!(resource_type)),
            "{}",
            logical_id
        );
    }
}

#[test]
fn alarms_streams_and_unknown_types_produce_nothing() {
    let document = cloudformation(&fixture());
    let resources = document["Resources"].as_object().unwrap();

    assert!(!resources.contains_key("HandlerErrors"));
    assert!(!resources.contains_key("OrdersStream"));
    assert!(!resources.contains_key("OrdersWorkflow"));
    assert!(resources["Orders"]["Properties"].get("StreamSpecification").is_none());
}

#[test]
fn references_are_intrinsic_functions() {
    let document = cloudformation(&fixture());
    let resources = &document["Resources"];

    assert_eq!(
        resources["OrdersHandler"]["Properties"]["Role"],
        json!({"Fn::GetAtt": ["OrdersHandlerRole", "Arn"]})
    );
    let managed = resources["OrdersHandlerRole"]["Properties"]["ManagedPolicyArns"]
        .as_array()
        .unwrap();
    assert!(managed.contains(&json!({"Ref": "OrdersRead"})));
}

#[test]
fn colliding_logical_ids_fail_the_pass() {
    let settings = TemplateSettings::default();
    let err = BuildMetaTransformer::new(Flavor::CloudFormation, &settings, &NoResources)
        .transform(&build_meta(json!({
            "order-events": {"resource_type": "sns_topic"},
            "order_events": {"resource_type": "sqs_queue"}
        })))
        .unwrap_err();

    assert!(matches!(err, TransformError::DuplicateResource { .. }));
}

#[test]
fn generated_policy_ids_yield_to_entry_ids() {
    let policy = json!({"Version": "2012-10-17", "Statement": []});
    for entries in [
        json!({
            "site": {"resource_type": "s3_bucket", "policy": policy},
            "site-policy": {"resource_type": "iam_managed_policy", "policy_content": policy}
        }),
        json!({
            "site-policy": {"resource_type": "iam_managed_policy", "policy_content": policy},
            "site": {"resource_type": "s3_bucket", "policy": policy}
        }),
    ] {
        let document = cloudformation(&build_meta(entries));
        let resources = &document["Resources"];

        assert_eq!(resources["Site"]["Type"], "AWS::S3::Bucket");
        assert_eq!(resources["SitePolicy"]["Type"], "AWS::IAM::ManagedPolicy");
        assert_eq!(resources["SitePolicy2"]["Type"], "AWS::S3::BucketPolicy");
        assert_eq!(resources["SitePolicy2"]["Properties"]["Bucket"], json!({"Ref": "Site"}));
    }
}

#[test]
fn composing_twice_is_identical() {
    let settings = TemplateSettings::default();
    let transformer = BuildMetaTransformer::new(Flavor::CloudFormation, &settings, &NoResources);
    let meta = fixture();

    assert_eq!(
        transformer.transform(&meta).unwrap(),
        transformer.transform(&meta).unwrap()
    );
}

#[test]
fn all_flavor_renders_both_documents() {
    let settings = TemplateSettings::default();
    let templates = metaform::render_templates(&fixture(), Flavor::All, &settings, &NoResources)
        .unwrap();

    let names: Vec<&str> = templates.iter().map(|t| t.file_name()).collect();
    assert_eq!(
        names,
        vec!["terraform_template.tf.json", "cloudformation_template.yaml"]
    );
}
