//! Shared helpers for integration tests
#![allow(dead_code)]

use metaform::BuildMeta;
use serde_json::Value;

pub const BUILD_META: &str = include_str!("../fixtures/build_meta.json");

pub fn fixture() -> BuildMeta {
    BuildMeta::from_json(BUILD_META).unwrap()
}

pub fn build_meta(value: Value) -> BuildMeta {
    BuildMeta::from_value(value).unwrap()
}

/// Body of the Terraform entry `label.name` in a composed document
pub fn tf_entry<'a>(document: &'a Value, label: &str, name: &str) -> Option<&'a Value> {
    document["resource"]
        .as_array()?
        .iter()
        .filter_map(|bucket| bucket.get(label))
        .filter_map(Value::as_array)
        .flatten()
        .find_map(|entry| entry.get(name))
}
