//! Derived route identity
//!
//! The gateway assigns routes an opaque id on creation and no human-chosen
//! name, so a local route definition and a remote route can only be matched
//! through their match criteria. The identity key canonicalizes those
//! criteria: values sorted within each field, fields joined in a fixed
//! order. The key is recomputed on every comparison and never cached — the
//! remote route's fields may have changed between calls.

use crate::client::RouteConfig;

/// Canonical identity key for a route's match criteria.
///
/// Each present, non-empty field (hosts, paths, methods — fixed order) is
/// sorted lexicographically and joined with `,`; the per-field strings are
/// joined with `|`, omitting absent fields. Two routes are the same route
/// iff their keys are equal. Total over its domain: a config with no match
/// fields yields `""` (such a config is rejected upstream by validation,
/// not here).
pub fn identity_key(config: &RouteConfig) -> String {
    let mut fields = Vec::new();

    for values in [&config.hosts, &config.paths, &config.methods] {
        if let Some(values) = values {
            if !values.is_empty() {
                let mut sorted = values.clone();
                sorted.sort();
                fields.push(sorted.join(","));
            }
        }
    }

    fields.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        hosts: Option<&[&str]>,
        paths: Option<&[&str]>,
        methods: Option<&[&str]>,
    ) -> RouteConfig {
        let to_vec = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        RouteConfig {
            hosts: hosts.map(to_vec),
            paths: paths.map(to_vec),
            methods: methods.map(to_vec),
        }
    }

    #[test]
    fn single_field_key_is_sorted_values() {
        let key = identity_key(&config(None, Some(&["/products", "/users"]), None));
        assert_eq!(key, "/products,/users");
    }

    #[test]
    fn fields_join_in_fixed_order() {
        let key = identity_key(&config(
            Some(&["www.example.com", "example.com"]),
            Some(&["/products", "/users"]),
            None,
        ));
        assert_eq!(key, "example.com,www.example.com|/products,/users");
    }

    #[test]
    fn key_is_order_independent_within_a_field() {
        let forward = identity_key(&config(
            Some(&["a.com", "b.com"]),
            Some(&["/x", "/y"]),
            Some(&["GET", "POST"]),
        ));
        let shuffled = identity_key(&config(
            Some(&["b.com", "a.com"]),
            Some(&["/y", "/x"]),
            Some(&["POST", "GET"]),
        ));
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn cross_field_order_is_fixed_by_the_algorithm() {
        // hosts always come before paths regardless of how the values
        // compare lexicographically
        let key = identity_key(&config(Some(&["z.example.com"]), Some(&["/a"]), None));
        assert_eq!(key, "z.example.com|/a");
    }

    #[test]
    fn empty_config_yields_empty_key() {
        assert_eq!(identity_key(&RouteConfig::default()), "");
        assert_eq!(
            identity_key(&config(Some(&[]), Some(&[]), Some(&[]))),
            ""
        );
    }

    #[test]
    fn empty_fields_are_omitted() {
        let key = identity_key(&config(Some(&[]), Some(&["/users"]), None));
        assert_eq!(key, "/users");
    }
}
