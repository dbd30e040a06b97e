//! Order portal backend.
//!
//! Vendors submit fabrication orders with attachments; staff progress them
//! through a fixed set of statuses. Every transition is recorded in a status
//! ledger and announced to subscribed webhooks.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, policies
//! and services behind ports; [`inbound`] and [`outbound`] hold the adapters;
//! [`server`] wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
