//! Property tests for generated names.

use proptest::prelude::*;

use metaform::infrastructure::shared::{path_slug, tf_name, to_logical_id};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: logical ids are non-empty, alphanumeric and start with a letter.
    #[test]
    fn property_logical_id_is_alphanumeric(name in "(?s).{0,64}") {
        let id = to_logical_id(&name);
        prop_assert!(!id.is_empty());
        prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        prop_assert!(id.starts_with(|c: char| c.is_ascii_alphabetic()));
    }

    /// PROPERTY: separators do not matter, only the words between them.
    #[test]
    fn property_logical_id_ignores_separator_style(
        words in proptest::collection::vec("[a-z][a-z0-9]{0,8}", 1..5)
    ) {
        prop_assert_eq!(to_logical_id(&words.join("-")), to_logical_id(&words.join("_")));
    }

    /// PROPERTY: Terraform names only use identifier characters.
    #[test]
    fn property_tf_name_is_identifier_safe(
        parts in proptest::collection::vec("(?s).{0,16}", 1..4)
    ) {
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let name = tf_name(&refs);
        prop_assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        prop_assert!(!name.starts_with(|c: char| c.is_ascii_digit()));
    }

    /// PROPERTY: path slugs never contain slashes and are never empty.
    #[test]
    fn property_path_slug_is_flat(path in "[/a-z{}0-9_-]{0,32}") {
        let slug = path_slug(&path);
        prop_assert!(!slug.is_empty());
        prop_assert!(!slug.contains('/'));
    }

    /// PROPERTY: distinct normalized paths never share a slug.
    #[test]
    fn property_path_slug_is_one_to_one(
        a in proptest::collection::vec("[a-z_{}+-]{1,4}", 0..4),
        b in proptest::collection::vec("[a-z_{}+-]{1,4}", 0..4),
    ) {
        prop_assume!(a != b);
        let path = |segments: &[String]| format!("/{}", segments.join("/"));
        prop_assert_ne!(path_slug(&path(&a)), path_slug(&path(&b)));
    }
}
