//! Name derivation for generated resources

/// CloudFormation logical id: alphanumeric PascalCase (`my-table` -> `MyTable`)
pub fn to_logical_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for part in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            id.push(first.to_ascii_uppercase());
            id.extend(chars);
        }
    }
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, 'R');
    }
    id
}

/// Slug of the API root path. Never produced for another path, since a
/// non-root slug cannot start with the segment separator.
pub const ROOT_SLUG: &str = "_root";

/// Identifier-safe slug of an API path, one-to-one over normalized paths.
///
/// Segments are joined with `_`. Letters and digits pass through; every other
/// character becomes a `-` escape: `-` -> `--`, `_` -> `-_`, `{` -> `-o`,
/// `}` -> `-c`, `+` -> `-p`, anything else `-x` plus two hex digits per byte.
/// `/users/{id}` -> `users_-oid-c`, `/` -> `_root`.
pub fn path_slug(path: &str) -> String {
    let mut slug = String::with_capacity(path.len());
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        if !slug.is_empty() {
            slug.push('_');
        }
        for c in segment.chars() {
            match c {
                c if c.is_ascii_alphanumeric() => slug.push(c),
                '-' => slug.push_str("--"),
                '_' => slug.push_str("-_"),
                '{' => slug.push_str("-o"),
                '}' => slug.push_str("-c"),
                '+' => slug.push_str("-p"),
                other => {
                    let mut buf = [0u8; 4];
                    for byte in other.encode_utf8(&mut buf).bytes() {
                        slug.push_str(&format!("-x{:02x}", byte));
                    }
                }
            }
        }
    }

    if slug.is_empty() {
        ROOT_SLUG.to_string()
    } else {
        slug
    }
}

/// Readable words of an API path for logical ids: `/users/{id}` -> `users id`.
///
/// Lossy; callers must resolve clashes themselves.
pub fn path_words(path: &str) -> String {
    let words = path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if words.is_empty() {
        "root".to_string()
    } else {
        words
    }
}

/// Terraform resource name: letters, digits, `_` and `-`, not starting with a digit
pub fn tf_name(parts: &[&str]) -> String {
    let mut name: String = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_ids() {
        assert_eq!(to_logical_id("my-table"), "MyTable");
        assert_eq!(to_logical_id("orders_v2"), "OrdersV2");
        assert_eq!(to_logical_id("camelCase"), "CamelCase");
        assert_eq!(to_logical_id("2fa-codes"), "R2faCodes");
        assert_eq!(to_logical_id("--"), "R");
    }

    #[test]
    fn path_slugs() {
        assert_eq!(path_slug("/"), "_root");
        assert_eq!(path_slug("/users"), "users");
        assert_eq!(path_slug("/users/{id}/orders"), "users_-oid-c_orders");
        assert_eq!(path_slug("/{proxy+}"), "-oproxy-p-c");
        assert_eq!(path_slug("/v1.2"), "v1-x2e2");
    }

    #[test]
    fn path_slugs_keep_distinct_paths_apart() {
        assert_ne!(path_slug("/"), path_slug("/root"));
        assert_ne!(path_slug("/a/b"), path_slug("/a_b"));
        assert_ne!(path_slug("/a-b"), path_slug("/a/b"));
        assert_ne!(path_slug("/a_/b"), path_slug("/a/_b"));
        assert_ne!(path_slug("/{id}"), path_slug("/id"));
    }

    #[test]
    fn path_words_are_readable() {
        assert_eq!(path_words("/"), "root");
        assert_eq!(path_words("/users/{id}/orders"), "users id orders");
        assert_eq!(path_words("/{proxy+}"), "proxy");
    }

    #[test]
    fn tf_names() {
        assert_eq!(tf_name(&["my-api", "users_id", "get"]), "my-api_users_id_get");
        assert_eq!(tf_name(&["api", "", "x.y"]), "api_x_y");
        assert_eq!(tf_name(&["1st"]), "_1st");
    }
}
