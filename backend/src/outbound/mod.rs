//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: in-memory repositories for orders, users and webhook
//!   subscriptions
//! - **files**: attachment storage on a `cap_std` directory capability
//! - **webhooks**: background dispatch queue and reqwest transport
//! - **auth**: bearer-token directory resolving principals
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod auth;
pub mod files;
pub mod persistence;
pub mod webhooks;
