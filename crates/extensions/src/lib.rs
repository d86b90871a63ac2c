//! PagerDuty Extension resource binding.
//!
//! An *extension* is a third-party integration registered against a PagerDuty
//! account: a callback endpoint, the vendor schema describing it, and the
//! services it is attached to. This crate maps the `/extensions` REST
//! resource onto typed Rust values.
//!
//! ## Architectural Layer
//!
//! **Resource binding.** Request/response shapes and the envelope contract
//! live here. Transport, authentication, status mapping, and retries are
//! reached through [`pagerduty::ApiClient`]; this crate never retries.
//!
//! ## Operations
//!
//! | Method | HTTP |
//! |--------|------|
//! | [`ExtensionService::list_extensions`] | `GET /extensions?…` |
//! | [`ExtensionService::list_all_extensions`] | repeated `GET /extensions?…` |
//! | [`ExtensionService::create_extension`] | `POST /extensions` |
//! | [`ExtensionService::get_extension`] | `GET /extensions/{id}` |
//! | [`ExtensionService::update_extension`] | `PUT /extensions/{id}` |
//! | [`ExtensionService::delete_extension`] | `DELETE /extensions/{id}` |
//! | [`ExtensionService::enable_extension`] | `POST /extensions/{id}/enable` |

pub mod envelope;
pub mod model;
pub mod service;

#[cfg(test)]
mod testing;

pub use envelope::unwrap_extension_envelope;
pub use model::{Extension, ListExtensionOptions, ListExtensionResponse};
pub use service::ExtensionService;
