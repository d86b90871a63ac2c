//! Shared value types for every PagerDuty resource.
//!
//! PagerDuty resources share a common identity block (`id`, `type`,
//! `summary`, `self`, `html_url`) and list endpoints share a common
//! pagination envelope (`limit`, `offset`, `more`, `total`). Resource types
//! compose these as named fields flattened into their own JSON shape rather
//! than repeating them.
//!
//! Unset fields are never written: every optional field carries a
//! `skip_serializing_if` predicate, so an unset field does not reach the
//! server as `null` or `""` (PagerDuty treats a present field as an intent to
//! change it).

use serde::{Deserialize, Serialize};

use crate::query::QueryString;

/// Returns `true` for `None` and for `Some("")`.
///
/// Used as a `skip_serializing_if` predicate on optional string fields.
pub fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

// ---------------------------------------------------------------------------
// Resource identity
// ---------------------------------------------------------------------------

/// Identity and reference block common to every PagerDuty resource.
///
/// Appears both as the identity of a full resource (flattened into it) and as
/// a reference to another resource (e.g. an extension's schema).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiObject {
    /// Server-assigned identifier. Unset on create.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub id: Option<String>,

    /// Resource type tag, e.g. `"extension"` or `"service_reference"`.
    #[serde(rename = "type", default, skip_serializing_if = "is_unset")]
    pub kind: Option<String>,

    /// Short human-readable summary.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub summary: Option<String>,

    /// API URL of the resource.
    #[serde(rename = "self", default, skip_serializing_if = "is_unset")]
    pub self_url: Option<String>,

    /// Web UI URL of the resource.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub html_url: Option<String>,
}

impl ApiObject {
    /// Builds a reference to another resource by id and type tag.
    pub fn reference(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Returns `true` when no field is set.
    ///
    /// Used as a `skip_serializing_if` predicate where a whole reference is optional.
    pub fn is_empty(&self) -> bool {
        is_unset(&self.id)
            && is_unset(&self.kind)
            && is_unset(&self.summary)
            && is_unset(&self.self_url)
            && is_unset(&self.html_url)
    }

    /// Returns the id as a string slice, if set.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination envelope returned alongside every list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Page size the server applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Offset of the first item in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    /// Whether further pages exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more: Option<bool>,

    /// Total number of matching items. Only populated when requested with
    /// [`PageQuery::total`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl ListPage {
    /// Returns `true` if the server reported further pages.
    ///
    /// An absent `more` flag is read as "no more pages".
    pub fn has_more(&self) -> bool {
        self.more.unwrap_or(false)
    }
}

/// Pagination parameters sent with a list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Requested page size.
    pub limit: Option<u32>,

    /// Offset of the first item to return.
    pub offset: Option<u32>,

    /// Ask the server to compute [`ListPage::total`].
    pub total: bool,
}

impl PageQuery {
    /// Appends the set parameters to `query`.
    pub fn append_to(&self, query: &mut QueryString) {
        query.push_opt("limit", self.limit);
        query.push_opt("offset", self.offset);
        query.push_flag("total", self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_identity_fields_are_not_serialized() {
        let object = ApiObject {
            id: Some("P1".to_string()),
            summary: Some(String::new()),
            ..ApiObject::default()
        };

        let value = serde_json::to_value(&object).unwrap();

        assert_eq!(value, json!({ "id": "P1" }));
    }

    #[test]
    fn identity_uses_wire_names_for_type_and_self() {
        let value = json!({
            "id": "PJFWPEP",
            "type": "extension",
            "summary": "My Webhook",
            "self": "https://api.pagerduty.com/extensions/PJFWPEP",
            "html_url": null
        });

        let object: ApiObject = serde_json::from_value(value).unwrap();

        assert_eq!(object.id(), Some("PJFWPEP"));
        assert_eq!(object.kind.as_deref(), Some("extension"));
        assert_eq!(
            object.self_url.as_deref(),
            Some("https://api.pagerduty.com/extensions/PJFWPEP")
        );
        assert_eq!(object.html_url, None);
    }

    #[test]
    fn reference_is_not_empty() {
        let reference = ApiObject::reference("PJFWPEP", "extension_schema_reference");
        assert!(!reference.is_empty());
        assert!(ApiObject::default().is_empty());
    }

    #[test]
    fn list_page_without_more_flag_has_no_more_pages() {
        let page: ListPage = serde_json::from_value(json!({ "limit": 25, "offset": 0 })).unwrap();
        assert!(!page.has_more());
        assert_eq!(page.total, None);
    }

    #[test]
    fn empty_page_query_adds_nothing() {
        let mut query = QueryString::new();
        PageQuery::default().append_to(&mut query);
        assert!(query.is_empty());
    }

    #[test]
    fn page_query_encodes_set_fields() {
        let mut query = QueryString::new();
        PageQuery {
            limit: Some(50),
            offset: Some(100),
            total: true,
        }
        .append_to(&mut query);

        assert_eq!(query.encode(), "limit=50&offset=100&total=true");
    }
}
