//! The `/extensions` resource binding.

use pagerduty::{ApiClient, ApiError, ExtensionId, RequestOptions};
use tracing::{debug, instrument};

use crate::envelope::{unwrap_extension_envelope, wrap_extension};
use crate::{Extension, ListExtensionOptions, ListExtensionResponse};

const COLLECTION_PATH: &str = "/extensions";

fn resource_path(id: &ExtensionId) -> String {
    format!("{COLLECTION_PATH}/{id}")
}

/// Typed access to the PagerDuty `/extensions` resource.
///
/// Every method is a single stateless exchange with the shared client
/// (`list_all_extensions` chains several). The service holds no mutable state
/// and can be shared between tasks when `C` can.
#[derive(Debug, Clone)]
pub struct ExtensionService<C> {
    client: C,
    options: RequestOptions,
}

impl<C: ApiClient> ExtensionService<C> {
    /// Creates a binding over `client`.
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: RequestOptions::default(),
        }
    }

    /// Sets the options sent with every write (`POST`, `PUT`).
    #[must_use]
    pub fn with_request_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Lists one page of extensions.
    ///
    /// # Errors
    ///
    /// Propagates the client's transport and status errors;
    /// [`ApiError::Decode`] if the body is not a list envelope.
    #[instrument(skip(self, options), fields(query = tracing::field::Empty))]
    pub async fn list_extensions(
        &self,
        options: &ListExtensionOptions,
    ) -> Result<ListExtensionResponse, ApiError> {
        let query = options.to_query();
        tracing::Span::current().record("query", query.encode().as_str());

        let response = self
            .client
            .get(&query.append_to_path(COLLECTION_PATH))
            .await?;
        let page: ListExtensionResponse = response.decode_json()?;

        debug!(
            count = page.extensions.len(),
            more = page.page.has_more(),
            "Listed extensions"
        );
        Ok(page)
    }

    /// Lists every extension matching `options`, following pagination.
    ///
    /// Starts at `options.page.offset` (or 0) and keeps `options.page.limit`
    /// as the page size. Stops when the server reports no further pages or
    /// returns an empty page. Results keep server order across pages.
    ///
    /// # Errors
    ///
    /// The first error from any page request; earlier pages are discarded.
    #[instrument(skip(self, options))]
    pub async fn list_all_extensions(
        &self,
        options: &ListExtensionOptions,
    ) -> Result<Vec<Extension>, ApiError> {
        let mut request = options.clone();
        let mut offset = options.page.offset.unwrap_or(0);
        let mut extensions = Vec::new();

        loop {
            request.page.offset = Some(offset);
            let page = self.list_extensions(&request).await?;
            let received = page.extensions.len();
            extensions.extend(page.extensions);

            if received == 0 || !page.page.has_more() {
                break;
            }
            offset = match u32::try_from(received)
                .ok()
                .and_then(|n| offset.checked_add(n))
            {
                Some(next) => next,
                None => break,
            };
        }

        debug!(count = extensions.len(), "Listed all extensions");
        Ok(extensions)
    }

    /// Creates an extension.
    ///
    /// # Errors
    ///
    /// Propagates client errors; [`ApiError::Protocol`] if the response has
    /// no `"extension"` key.
    #[instrument(skip(self, extension), fields(name = extension.name.as_deref()))]
    pub async fn create_extension(&self, extension: &Extension) -> Result<Extension, ApiError> {
        let body = wrap_extension(extension)?;
        let response = self
            .client
            .post(COLLECTION_PATH, Some(&body), &self.options)
            .await?;
        let created = unwrap_extension_envelope(&response)?;

        debug!(id = created.id(), "Created extension");
        Ok(created)
    }

    /// Fetches one extension.
    ///
    /// A missing extension surfaces as the client's `404` status error.
    ///
    /// # Errors
    ///
    /// Propagates client errors; [`ApiError::Protocol`] if the response has
    /// no `"extension"` key.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn get_extension(&self, id: &ExtensionId) -> Result<Extension, ApiError> {
        let response = self.client.get(&resource_path(id)).await?;
        unwrap_extension_envelope(&response)
    }

    /// Replaces an extension with `extension`. Unset fields are not sent.
    ///
    /// # Errors
    ///
    /// Propagates client errors; [`ApiError::Protocol`] if the response has
    /// no `"extension"` key.
    #[instrument(skip(self, id, extension), fields(id = %id))]
    pub async fn update_extension(
        &self,
        id: &ExtensionId,
        extension: &Extension,
    ) -> Result<Extension, ApiError> {
        let body = wrap_extension(extension)?;
        let response = self
            .client
            .put(&resource_path(id), &body, &self.options)
            .await?;
        let updated = unwrap_extension_envelope(&response)?;

        debug!("Updated extension");
        Ok(updated)
    }

    /// Deletes an extension.
    ///
    /// # Errors
    ///
    /// Propagates client errors unchanged.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete_extension(&self, id: &ExtensionId) -> Result<(), ApiError> {
        self.client.delete(&resource_path(id)).await?;
        debug!("Deleted extension");
        Ok(())
    }

    /// Re-enables an extension PagerDuty has temporarily disabled.
    ///
    /// # Errors
    ///
    /// Propagates client errors; [`ApiError::Protocol`] if the response has
    /// no `"extension"` key.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn enable_extension(&self, id: &ExtensionId) -> Result<Extension, ApiError> {
        let path = format!("{}/enable", resource_path(id));
        let response = self.client.post(&path, None, &self.options).await?;
        unwrap_extension_envelope(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;
    use pagerduty::{ApiResponse, ExtensionSchemaId, PageQuery, ServiceId};
    use serde_json::json;

    fn id(value: &str) -> ExtensionId {
        ExtensionId::new(value).unwrap()
    }

    fn service(
        replies: Vec<Result<ApiResponse, ApiError>>,
    ) -> ExtensionService<RecordingClient> {
        ExtensionService::new(RecordingClient::replying(replies))
    }

    #[tokio::test]
    async fn create_posts_envelope_and_unwraps_response() {
        let service = service(vec![RecordingClient::json(
            r#"{"extension": {"id": "E1", "name": "Foo"}}"#,
        )]);
        let schema = ExtensionSchemaId::new("PJFWPEP").unwrap();

        let created = service
            .create_extension(&Extension::new("Foo").with_schema(&schema))
            .await
            .unwrap();

        assert_eq!(created.id(), Some("E1"));
        assert_eq!(created.name.as_deref(), Some("Foo"));

        let requests = service.client().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/extensions");
        assert_eq!(
            requests[0].body,
            Some(json!({
                "extension": {
                    "name": "Foo",
                    "extension_schema": { "id": "PJFWPEP", "type": "extension_schema_reference" }
                }
            }))
        );
    }

    #[tokio::test]
    async fn create_without_envelope_key_is_a_protocol_error() {
        let service = service(vec![RecordingClient::json("{}")]);

        let err = service
            .create_extension(&Extension::new("Foo"))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::missing_field("extension"));
    }

    #[tokio::test]
    async fn get_requests_the_resource_path_without_query() {
        let service = service(vec![RecordingClient::json(
            r#"{"extension": {"id": "E1", "name": "Foo"}}"#,
        )]);

        let extension = service.get_extension(&id("E1")).await.unwrap();

        assert_eq!(extension.id(), Some("E1"));
        let requests = service.client().requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/extensions/E1");
    }

    #[tokio::test]
    async fn get_propagates_not_found_unchanged() {
        let not_found = ApiError::Status {
            status: 404,
            message: "Not Found".to_string(),
            retry_after: None,
        };
        let service = service(vec![Err(not_found.clone())]);

        let err = service.get_extension(&id("E404")).await.unwrap_err();

        assert_eq!(err, not_found);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_puts_envelope_to_resource_path() {
        let service = service(vec![RecordingClient::json(
            r#"{"extension": {"id": "E1", "name": "Bar", "endpoint_url": "https://example.com"}}"#,
        )])
        .with_request_options(RequestOptions::new().with_from("oncall@example.com"));

        let updated = service
            .update_extension(&id("E1"), &Extension::new("Bar"))
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Bar"));
        let requests = service.client().requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/extensions/E1");
        assert_eq!(requests[0].body, Some(json!({ "extension": { "name": "Bar" } })));
        assert_eq!(
            requests[0].headers,
            vec![("From".to_string(), "oncall@example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn update_without_envelope_key_is_a_protocol_error() {
        let service = service(vec![RecordingClient::json(r#"{"addon": {}}"#)]);

        let err = service
            .update_extension(&id("E1"), &Extension::new("Bar"))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::missing_field("extension"));
    }

    #[tokio::test]
    async fn delete_issues_delete_and_returns_unit() {
        let service = service(vec![Ok(ApiResponse::new(204, Vec::new()))]);

        service.delete_extension(&id("E1")).await.unwrap();

        let requests = service.client().requests();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, "/extensions/E1");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn delete_propagates_client_error_untouched() {
        let failure = ApiError::Transport {
            message: "connection reset".to_string(),
            timed_out: false,
        };
        let service = service(vec![Err(failure.clone())]);

        let err = service.delete_extension(&id("E1")).await.unwrap_err();

        assert_eq!(err, failure);
    }

    #[tokio::test]
    async fn enable_posts_without_body() {
        let service = service(vec![RecordingClient::json(
            r#"{"extension": {"id": "E1", "temporarily_disabled": false}}"#,
        )]);

        let enabled = service.enable_extension(&id("E1")).await.unwrap();

        assert_eq!(enabled.temporarily_disabled, Some(false));
        let requests = service.client().requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/extensions/E1/enable");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn list_with_empty_options_hits_bare_collection() {
        let service = service(vec![RecordingClient::json(
            r#"{"extensions": [{"id": "B"}, {"id": "A"}], "limit": 25, "offset": 0, "more": false}"#,
        )]);

        let page = service
            .list_extensions(&ListExtensionOptions::default())
            .await
            .unwrap();

        let ids: Vec<_> = page.extensions.iter().filter_map(Extension::id).collect();
        assert_eq!(ids, ["B", "A"]);
        assert_eq!(service.client().requests()[0].path, "/extensions");
    }

    #[tokio::test]
    async fn list_encodes_filters_into_the_path() {
        let service = service(vec![RecordingClient::json(r#"{"extensions": []}"#)]);
        let options = ListExtensionOptions {
            extension_objects: vec![ServiceId::new("P1").unwrap(), ServiceId::new("P2").unwrap()],
            query: Some("hook".to_string()),
            ..ListExtensionOptions::default()
        };

        service.list_extensions(&options).await.unwrap();

        assert_eq!(
            service.client().requests()[0].path,
            "/extensions?extension_objects%5B%5D=P1&extension_objects%5B%5D=P2&query=hook"
        );
    }

    #[tokio::test]
    async fn list_with_malformed_body_is_a_decode_error() {
        let service = service(vec![RecordingClient::json(r#"{"extensions": "nope"}"#)]);

        let err = service
            .list_extensions(&ListExtensionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn list_all_follows_pages_in_order() {
        let service = service(vec![
            RecordingClient::json(
                r#"{"extensions": [{"id": "A"}, {"id": "B"}], "limit": 2, "offset": 0, "more": true}"#,
            ),
            RecordingClient::json(
                r#"{"extensions": [{"id": "C"}], "limit": 2, "offset": 2, "more": false}"#,
            ),
        ]);
        let options = ListExtensionOptions {
            page: PageQuery {
                limit: Some(2),
                ..PageQuery::default()
            },
            ..ListExtensionOptions::default()
        };

        let all = service.list_all_extensions(&options).await.unwrap();

        let ids: Vec<_> = all.iter().filter_map(Extension::id).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        let paths: Vec<_> = service
            .client()
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            ["/extensions?limit=2&offset=0", "/extensions?limit=2&offset=2"]
        );
    }

    #[tokio::test]
    async fn list_all_stops_on_an_empty_page() {
        let service = service(vec![RecordingClient::json(
            r#"{"extensions": [], "more": true}"#,
        )]);

        let all = service
            .list_all_extensions(&ListExtensionOptions::default())
            .await
            .unwrap();

        assert!(all.is_empty());
        assert_eq!(service.client().requests().len(), 1);
    }
}
