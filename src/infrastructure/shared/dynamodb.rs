//! Flavor-agnostic model of a `dynamodb_table` entry

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const PROVISIONED: &str = "PROVISIONED";
pub const PAY_PER_REQUEST: &str = "PAY_PER_REQUEST";

const KEY_TYPES: [&str; 3] = ["S", "N", "B"];

/// Partition key plus optional sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub hash_key: String,
    pub range_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: String,
    pub keys: KeySchema,
    pub read_capacity: Option<i64>,
    pub write_capacity: Option<i64>,
}

/// One application-autoscaling setting for the table or one of its indexes
#[derive(Debug, Clone, PartialEq)]
pub struct AutoscalingSetting {
    /// `table/<name>` or `table/<name>/index/<index>`
    pub resource_id: String,
    pub dimension: String,
    pub min_capacity: i64,
    pub max_capacity: i64,
    pub role_name: Option<String>,
    pub policy_name: Option<String>,
    pub target_utilization: Option<Value>,
    pub scale_in_cooldown: Option<i64>,
    pub scale_out_cooldown: Option<i64>,
}

impl AutoscalingSetting {
    /// Predefined metric tracked by a target-tracking policy on this dimension
    pub fn predefined_metric(&self) -> &'static str {
        if self.dimension.contains("Write") {
            "DynamoDBWriteCapacityUtilization"
        } else {
            "DynamoDBReadCapacityUtilization"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub keys: KeySchema,
    /// Attribute name -> type code, de-duplicated, in first-seen order
    pub attributes: IndexMap<String, String>,
    pub billing_mode: String,
    pub read_capacity: Option<i64>,
    pub write_capacity: Option<i64>,
    pub global_indexes: Vec<SecondaryIndex>,
    pub autoscaling: Vec<AutoscalingSetting>,
}

impl TableSpec {
    pub fn parse(table_name: &str, attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let mut attributes = IndexMap::new();

        let hash_key = key_attribute(attrs, "hash_key_name", "hash_key_type", &mut attributes)?
            .ok_or_else(|| attrs.missing("hash_key_name"))?;
        let range_key = key_attribute(attrs, "sort_key_name", "sort_key_type", &mut attributes)?;

        let read_capacity = attrs.int("read_capacity")?;
        let write_capacity = attrs.int("write_capacity")?;
        let billing_mode = match attrs.str("billing_mode")? {
            Some(mode) => mode.to_ascii_uppercase(),
            None if read_capacity.is_some() || write_capacity.is_some() => PROVISIONED.to_string(),
            None => PAY_PER_REQUEST.to_string(),
        };

        let mut global_indexes = Vec::new();
        for index in attrs.objects("global_indexes")? {
            let hash_key =
                key_attribute(&index, "index_key_name", "index_key_type", &mut attributes)?
                    .ok_or_else(|| index.missing("index_key_name"))?;
            let range_key = key_attribute(
                &index,
                "index_sort_key_name",
                "index_sort_key_type",
                &mut attributes,
            )?;
            global_indexes.push(SecondaryIndex {
                name: index.required_str("name")?.to_string(),
                keys: KeySchema {
                    hash_key,
                    range_key,
                },
                read_capacity: index.int("read_capacity")?.or(read_capacity),
                write_capacity: index.int("write_capacity")?.or(write_capacity),
            });
        }

        let mut autoscaling = Vec::new();
        for setting in attrs.objects("autoscaling")? {
            let resource_id = match setting.str("resource_name")? {
                Some(id) if id.starts_with("table/") => id.to_string(),
                Some(id) => format!("table/{}", id),
                None => format!("table/{}", table_name),
            };
            let config = match setting.object("config")? {
                Some(config) => Some(setting.child(config)),
                None => None,
            };
            autoscaling.push(AutoscalingSetting {
                resource_id,
                dimension: setting.required_str("dimension")?.to_string(),
                min_capacity: setting.required_int("min_capacity")?,
                max_capacity: setting.required_int("max_capacity")?,
                role_name: setting.str("role_name")?.map(str::to_string),
                policy_name: match &config {
                    Some(c) => c.str("policy_name")?.map(str::to_string),
                    None => None,
                },
                target_utilization: config
                    .as_ref()
                    .and_then(|c| c.value("target_utilization"))
                    .cloned(),
                scale_in_cooldown: match &config {
                    Some(c) => c.int("scale_in_cooldown")?,
                    None => None,
                },
                scale_out_cooldown: match &config {
                    Some(c) => c.int("scale_out_cooldown")?,
                    None => None,
                },
            });
        }

        Ok(Self {
            keys: KeySchema {
                hash_key,
                range_key,
            },
            attributes,
            billing_mode,
            read_capacity,
            write_capacity,
            global_indexes,
            autoscaling,
        })
    }

    pub fn is_provisioned(&self) -> bool {
        self.billing_mode == PROVISIONED
    }
}

/// Record a key attribute, validating its type code. `None` when the name is absent.
fn key_attribute(
    attrs: &AttributeReader<'_>,
    name_key: &str,
    type_key: &str,
    attributes: &mut IndexMap<String, String>,
) -> TransformResult<Option<String>> {
    let Some(name) = attrs.str(name_key)? else {
        return Ok(None);
    };
    let key_type = attrs.str(type_key)?.unwrap_or("S").to_ascii_uppercase();
    if !KEY_TYPES.contains(&key_type.as_str()) {
        return Err(attrs.invalid(
            type_key,
            format!("key type must be one of S, N or B, got '{}'", key_type),
        ));
    }
    attributes
        .entry(name.to_string())
        .or_insert(key_type);
    Ok(Some(name.to_string()))
}

/// Table name and view type of a `dynamodb_stream` entry
pub fn stream_target<'a>(attrs: &AttributeReader<'a>) -> TransformResult<(&'a str, &'a str)> {
    let table = attrs
        .str_any(&["table_name", "table"])?
        .ok_or_else(|| attrs.missing("table_name"))?;
    let view_type = attrs
        .str_any(&["view_type", "stream_view_type"])?
        .ok_or_else(|| attrs.missing("view_type"))?;
    Ok((table, view_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn billing_mode_defaults_from_capacity() {
        let on_demand = map(json!({"hash_key_name": "id", "hash_key_type": "S"}));
        let spec = TableSpec::parse("t", &AttributeReader::new("t", "dynamodb_table", &on_demand))
            .unwrap();
        assert_eq!(spec.billing_mode, PAY_PER_REQUEST);

        let provisioned = map(json!({"hash_key_name": "id", "read_capacity": 5}));
        let spec =
            TableSpec::parse("t", &AttributeReader::new("t", "dynamodb_table", &provisioned))
                .unwrap();
        assert!(spec.is_provisioned());
    }

    #[test]
    fn attributes_are_deduplicated_across_indexes() {
        let attrs = map(json!({
            "hash_key_name": "id",
            "hash_key_type": "S",
            "sort_key_name": "created",
            "sort_key_type": "N",
            "global_indexes": [
                {"name": "by-created", "index_key_name": "created", "index_key_type": "N"},
                {"name": "by-owner", "index_key_name": "owner", "index_key_type": "s",
                 "index_sort_key_name": "id", "index_sort_key_type": "S"}
            ]
        }));
        let spec =
            TableSpec::parse("t", &AttributeReader::new("t", "dynamodb_table", &attrs)).unwrap();

        let attributes: Vec<(&str, &str)> = spec
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(attributes, vec![("id", "S"), ("created", "N"), ("owner", "S")]);
        assert_eq!(spec.global_indexes[1].keys.range_key.as_deref(), Some("id"));
    }

    #[test]
    fn invalid_key_type_is_rejected() {
        let attrs = map(json!({"hash_key_name": "id", "hash_key_type": "STRING"}));
        let err = TableSpec::parse("t", &AttributeReader::new("t", "dynamodb_table", &attrs))
            .unwrap_err();
        assert!(err.to_string().contains("hash_key_type"));
    }

    #[test]
    fn missing_hash_key_is_rejected() {
        let attrs = map(json!({"read_capacity": 1}));
        let err = TableSpec::parse("t", &AttributeReader::new("t", "dynamodb_table", &attrs))
            .unwrap_err();
        assert!(err.to_string().contains("hash_key_name"));
    }

    #[test]
    fn autoscaling_defaults_to_table_resource() {
        let attrs = map(json!({
            "hash_key_name": "id",
            "autoscaling": [{
                "dimension": "dynamodb:table:WriteCapacityUnits",
                "min_capacity": 1,
                "max_capacity": 10,
                "config": {"target_utilization": 70.5}
            }]
        }));
        let spec = TableSpec::parse("orders", &AttributeReader::new("orders", "dynamodb_table", &attrs))
            .unwrap();

        let setting = &spec.autoscaling[0];
        assert_eq!(setting.resource_id, "table/orders");
        assert_eq!(setting.predefined_metric(), "DynamoDBWriteCapacityUtilization");
        assert_eq!(setting.target_utilization, Some(json!(70.5)));
    }

    #[test]
    fn stream_target_accepts_aliases() {
        let attrs = map(json!({"table": "orders", "stream_view_type": "NEW_IMAGE"}));
        let reader = AttributeReader::new("s", "dynamodb_stream", &attrs);
        assert_eq!(stream_target(&reader).unwrap(), ("orders", "NEW_IMAGE"));
    }
}
