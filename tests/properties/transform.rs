//! Property tests for whole transformation passes.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use metaform::{BuildMeta, BuildMetaTransformer, Flavor, NoResources, ResourceType, TemplateSettings};

fn topic_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z][a-z0-9]{0,10}", 0..6)
        .prop_map(|names| names.into_iter().collect())
}

fn unknown_tag() -> impl Strategy<Value = String> {
    "[a-z_]{1,20}".prop_filter("must not be a known resource type", |tag| {
        tag.parse::<ResourceType>().is_err()
    })
}

fn meta_with(topics: &[String], extra: Option<(&str, &str)>) -> BuildMeta {
    let mut entries = Map::new();
    for topic in topics {
        entries.insert(format!("topic-{}", topic), json!({"resource_type": "sns_topic"}));
    }
    if let Some((name, tag)) = extra {
        entries.insert(name.to_string(), json!({"resource_type": tag, "anything": [1, 2]}));
    }
    BuildMeta::from_value(Value::Object(entries)).unwrap()
}

fn render(flavor: Flavor, meta: &BuildMeta) -> String {
    let settings = TemplateSettings::default();
    BuildMetaTransformer::new(flavor, &settings, &NoResources)
        .transform(meta)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: entries with unknown resource types never change the output.
    #[test]
    fn property_unknown_types_are_ignored(topics in topic_names(), tag in unknown_tag()) {
        let plain = meta_with(&topics, None);
        let noisy = meta_with(&topics, Some(("zz-unknown", &tag)));

        for flavor in Flavor::ALL_CONCRETE {
            prop_assert_eq!(render(flavor, &plain), render(flavor, &noisy));
        }
    }

    /// PROPERTY: every pass over the same build meta yields the same document.
    #[test]
    fn property_transform_is_deterministic(topics in topic_names()) {
        let meta = meta_with(&topics, None);
        for flavor in Flavor::ALL_CONCRETE {
            prop_assert_eq!(render(flavor, &meta), render(flavor, &meta));
        }
    }

    /// PROPERTY: each topic lands in the Terraform document exactly once.
    #[test]
    fn property_every_topic_is_emitted(topics in topic_names()) {
        let document: Value = serde_json::from_str(&render(Flavor::Terraform, &meta_with(&topics, None))).unwrap();
        let emitted = document["resource"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|bucket| bucket.get("aws_sns_topic"))
            .filter_map(Value::as_array)
            .map(Vec::len)
            .sum::<usize>();
        prop_assert_eq!(emitted, topics.len());
    }
}
