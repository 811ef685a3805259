//! In-memory CloudFormation document
//!
//! Resources are keyed by logical id and compose in insertion order under
//! `Resources:`. Ids of build meta entries may be reserved up front; ids of
//! generated sub-resources come from [`CloudFormationTemplate::free_id`] and
//! never take a reserved or used id.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{TransformError, TransformResult};

pub const FORMAT_VERSION: &str = "2010-09-09";

/// One entry under `Resources`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CfResource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(rename = "Properties", skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl CfResource {
    pub fn new(resource_type: &str, properties: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            depends_on: Vec::new(),
            properties,
        }
    }

    pub fn depends_on(mut self, logical_ids: Vec<String>) -> Self {
        self.depends_on = logical_ids;
        self
    }
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Resources")]
    resources: &'a IndexMap<String, CfResource>,
}

/// Accumulated CloudFormation template for one pass
#[derive(Debug, Clone, Default)]
pub struct CloudFormationTemplate {
    resources: IndexMap<String, CfResource>,
    reserved: HashSet<String>,
}

impl CloudFormationTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `logical_id` for the build meta entry that owns it
    pub fn reserve(&mut self, logical_id: impl Into<String>) {
        self.reserved.insert(logical_id.into());
    }

    /// `candidate`, or `candidate` with the lowest numeric suffix from 2 up,
    /// that is neither reserved nor used yet
    pub fn free_id(&self, candidate: &str) -> String {
        let taken = |id: &str| self.reserved.contains(id) || self.resources.contains_key(id);
        if !taken(candidate) {
            return candidate.to_string();
        }
        (2u32..)
            .map(|n| format!("{}{}", candidate, n))
            .find(|id| !taken(id))
            .unwrap_or_else(|| candidate.to_string())
    }

    /// Add a resource under `logical_id`. Logical ids are unique per template.
    pub fn add(&mut self, logical_id: &str, resource: CfResource) -> TransformResult<()> {
        if self.resources.contains_key(logical_id) {
            return Err(TransformError::DuplicateResource {
                label: resource.resource_type,
                name: logical_id.to_string(),
            });
        }
        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    pub fn get(&self, logical_id: &str) -> Option<&CfResource> {
        self.resources.get(logical_id)
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    /// Logical ids of resources of `resource_type`, in insertion order
    pub fn ids_of_type(&self, resource_type: &str) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|(_, resource)| resource.resource_type == resource_type)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Serialize to the YAML template
    pub fn compose(&self) -> TransformResult<String> {
        let document = Document {
            format_version: FORMAT_VERSION,
            resources: &self.resources,
        };
        Ok(serde_yaml_ng::to_string(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn properties(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut template = CloudFormationTemplate::new();
        template
            .add("MyTable", CfResource::new("AWS::DynamoDB::Table", Map::new()))
            .unwrap();

        let err = template
            .add("MyTable", CfResource::new("AWS::S3::Bucket", Map::new()))
            .unwrap_err();
        assert!(matches!(err, TransformError::DuplicateResource { .. }));
    }

    #[test]
    fn free_id_skips_reserved_and_used_ids() {
        let mut template = CloudFormationTemplate::new();
        template.reserve("SitePolicy");
        assert_eq!(template.free_id("SiteBucket"), "SiteBucket");
        assert_eq!(template.free_id("SitePolicy"), "SitePolicy2");

        template
            .add("SitePolicy2", CfResource::new("AWS::S3::BucketPolicy", Map::new()))
            .unwrap();
        assert_eq!(template.free_id("SitePolicy"), "SitePolicy3");
    }

    #[test]
    fn reserved_id_is_still_available_to_its_owner() {
        let mut template = CloudFormationTemplate::new();
        template.reserve("SitePolicy");
        template
            .add("SitePolicy", CfResource::new("AWS::IAM::ManagedPolicy", Map::new()))
            .unwrap();
        assert!(template.contains("SitePolicy"));
    }

    #[test]
    fn compose_yaml_keeps_insertion_order() {
        let mut template = CloudFormationTemplate::new();
        template
            .add(
                "Alerts",
                CfResource::new("AWS::SNS::Topic", properties(json!({"TopicName": "alerts"}))),
            )
            .unwrap();
        template
            .add(
                "Deployment",
                CfResource::new("AWS::ApiGateway::Deployment", Map::new())
                    .depends_on(vec!["Alerts".to_string()]),
            )
            .unwrap();

        let document: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(&template.compose().unwrap()).unwrap();
        assert_eq!(document["AWSTemplateFormatVersion"].as_str(), Some(FORMAT_VERSION));

        let resources = document["Resources"].as_mapping().unwrap();
        let ids: Vec<&str> = resources.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["Alerts", "Deployment"]);
        assert_eq!(
            document["Resources"]["Alerts"]["Properties"]["TopicName"].as_str(),
            Some("alerts")
        );
        assert_eq!(
            document["Resources"]["Deployment"]["DependsOn"][0].as_str(),
            Some("Alerts")
        );
        assert!(document["Resources"]["Deployment"].get("Properties").is_none());
    }

    #[test]
    fn compose_is_repeatable() {
        let mut template = CloudFormationTemplate::new();
        template
            .add("Queue", CfResource::new("AWS::SQS::Queue", Map::new()))
            .unwrap();
        assert_eq!(template.compose().unwrap(), template.compose().unwrap());
    }
}
