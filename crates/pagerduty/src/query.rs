//! Query-string encoding for list endpoints.
//!
//! PagerDuty list endpoints take scalar filters as `key=value` and
//! list-valued filters with the bracket convention:
//! `extension_objects[]=P1&extension_objects[]=P2`.
//!
//! [`QueryString`] collects parameters and encodes them deterministically:
//! keys are emitted in sorted order, repeated values for one key keep the
//! order they were pushed in, and unset or empty values are never emitted.

use std::collections::BTreeMap;
use std::fmt::Display;

/// An ordered, form-encoded query string under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryString {
    /// Creates an empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key=value`. Empty values are skipped.
    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.params.entry(key.to_string()).or_default().push(value);
        }
        self
    }

    /// Adds `key=value` when `value` is `Some`.
    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Adds `key=true` when `flag` is set. A cleared flag is omitted, not sent as `false`.
    pub fn push_flag(&mut self, key: &str, flag: bool) -> &mut Self {
        if flag {
            self.push(key, "true");
        }
        self
    }

    /// Adds one `key[]=value` pair per item, in iteration order.
    pub fn push_list<I, T>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let key = format!("{key}[]");
        for value in values {
            self.push(&key, value);
        }
        self
    }

    /// Returns `true` if no parameter has been added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encodes the parameters as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Appends the encoded query to `path`, returning `path` unchanged when
    /// there is nothing to encode.
    pub fn append_to_path(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(encoded: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn empty_query_leaves_path_untouched() {
        let query = QueryString::new();
        assert_eq!(query.append_to_path("/extensions"), "/extensions");
    }

    #[test]
    fn keys_are_sorted_and_list_values_keep_their_order() {
        let mut query = QueryString::new();
        query
            .push("query", "web")
            .push_list("include", ["extension_schemas"])
            .push_list("extension_objects", ["P3", "P1", "P2"]);

        let pairs = decode(&query.encode());

        assert_eq!(
            pairs,
            vec![
                ("extension_objects[]".to_string(), "P3".to_string()),
                ("extension_objects[]".to_string(), "P1".to_string()),
                ("extension_objects[]".to_string(), "P2".to_string()),
                ("include[]".to_string(), "extension_schemas".to_string()),
                ("query".to_string(), "web".to_string()),
            ]
        );
    }

    #[test]
    fn brackets_and_spaces_are_percent_encoded() {
        let mut query = QueryString::new();
        query.push_list("include", ["a b"]);
        assert_eq!(query.encode(), "include%5B%5D=a+b");
    }

    #[test]
    fn empty_and_unset_values_are_omitted() {
        let mut query = QueryString::new();
        query
            .push("query", "")
            .push_opt::<u32>("limit", None)
            .push_flag("total", false)
            .push_list("include", Vec::<&str>::new());

        assert!(query.is_empty());
        assert_eq!(query.encode(), "");
    }
}
