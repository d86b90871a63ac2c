//! Core domain for the PagerDuty REST API bindings.
//!
//! This crate contains the value types shared by every resource binding, the
//! error and retry-policy types, the query-string encoder, and the
//! [`ApiClient`] port through which bindings reach the network. Resource
//! crates (e.g. `extensions`) build on these types; infrastructure crates
//! (e.g. `http-client`) implement [`ApiClient`].
//!
//! ## Architectural Layer
//!
//! **Domain types + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a request and a response look like; infrastructure
//! crates define *how* they travel.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype resource identifiers (`ExtensionId`, etc.) |
//! | [`types`] | Shared API value types (`ApiObject`, `ListPage`, `PageQuery`) |
//! | [`errors`] | Error and retry-policy types |
//! | [`client`] | The [`ApiClient`] port, [`ApiResponse`] and [`RequestOptions`] |
//! | [`query`] | Bracket-convention query-string encoder |

pub mod client;
pub mod errors;
pub mod identifiers;
pub mod query;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::{ApiClient, ApiResponse, RequestOptions};
pub use errors::{ApiError, RetryPolicy};
pub use identifiers::{ExtensionId, ExtensionSchemaId, ServiceId};
pub use query::QueryString;
pub use types::{ApiObject, ListPage, PageQuery};
