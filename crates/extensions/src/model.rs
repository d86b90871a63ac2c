//! Request and response shapes for the `/extensions` resource.

use pagerduty::types::is_unset;
use pagerduty::{ApiObject, ExtensionSchemaId, ListPage, PageQuery, QueryString, ServiceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SCHEMA_REFERENCE: &str = "extension_schema_reference";
const SERVICE_REFERENCE: &str = "service_reference";

fn is_unset_reference(reference: &Option<ApiObject>) -> bool {
    reference.as_ref().map_or(true, ApiObject::is_empty)
}

// ---------------------------------------------------------------------------
// Extension
// ---------------------------------------------------------------------------

/// A third-party integration registered against the account.
///
/// Every optional field is omitted from the serialized body when unset, so a
/// partially populated value sent with
/// [`crate::ExtensionService::update_extension`] never clears fields the
/// caller did not mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// Identity block (`id`, `type`, `summary`, `self`, `html_url`).
    #[serde(flatten)]
    pub object: ApiObject,

    /// Display name.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub name: Option<String>,

    /// URL the integration receives events at.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub endpoint_url: Option<String>,

    /// Reference to the schema describing this extension's type.
    #[serde(default, skip_serializing_if = "is_unset_reference")]
    pub extension_schema: Option<ApiObject>,

    /// References to the objects (usually services) the extension is attached to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_objects: Vec<ApiObject>,

    /// Set by PagerDuty when deliveries to the endpoint keep failing.
    /// Cleared with [`crate::ExtensionService::enable_extension`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporarily_disabled: Option<bool>,

    /// Schema-specific configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

impl Extension {
    /// Creates an extension with only a display name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the callback endpoint.
    #[must_use]
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Sets the schema reference.
    #[must_use]
    pub fn with_schema(mut self, schema: &ExtensionSchemaId) -> Self {
        self.extension_schema = Some(ApiObject::reference(schema.as_str(), SCHEMA_REFERENCE));
        self
    }

    /// Attaches the extension to a service.
    #[must_use]
    pub fn with_service(mut self, service: &ServiceId) -> Self {
        self.extension_objects
            .push(ApiObject::reference(service.as_str(), SERVICE_REFERENCE));
        self
    }

    /// Returns the server-assigned id, if set.
    pub fn id(&self) -> Option<&str> {
        self.object.id()
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Filters and pagination for [`crate::ExtensionService::list_extensions`].
///
/// Every field is optional; unset fields do not appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListExtensionOptions {
    /// Page size, offset, and total-count request.
    pub page: PageQuery,

    /// Only return extensions attached to these objects. Encoded as
    /// `extension_objects[]=…`.
    pub extension_objects: Vec<ServiceId>,

    /// Only return extensions of these schemas. Encoded as
    /// `extension_schema[]=…`.
    pub extension_schemas: Vec<ExtensionSchemaId>,

    /// Free-text filter on the extension name.
    pub query: Option<String>,

    /// Related resources to embed in the response (e.g. `"extension_schemas"`).
    pub include: Vec<String>,
}

impl ListExtensionOptions {
    /// Encodes the options with the bracket convention for list-valued fields.
    pub fn to_query(&self) -> QueryString {
        let mut query = QueryString::new();
        self.page.append_to(&mut query);
        query
            .push_list("extension_objects", &self.extension_objects)
            .push_list("extension_schema", &self.extension_schemas)
            .push_opt("query", self.query.as_deref())
            .push_list("include", &self.include);
        query
    }
}

/// One page of extensions, in the order the server returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListExtensionResponse {
    /// Pagination envelope.
    #[serde(flatten)]
    pub page: ListPage,

    /// The extensions on this page.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}
