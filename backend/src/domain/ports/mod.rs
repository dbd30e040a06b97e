//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, stores, transports) are implemented in
//! `outbound`; driving ports (commands and queries) are implemented by the
//! domain services and consumed by `inbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod attachment_store;
mod authenticator;
mod order_command;
mod order_query;
mod order_repository;
mod user_repository;
mod users_command;
mod users_query;
mod webhook_admin;
mod webhook_config_repository;
mod webhook_notifier;
mod webhook_transport;

#[cfg(test)]
pub use attachment_store::MockAttachmentStore;
pub use attachment_store::{AttachmentStore, AttachmentStoreError};
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{AuthenticationError, Authenticator};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::{CreateOrderRequest, OrderCommand};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{
    OrderListQuery, OrderPersistenceError, OrderRecord, OrderRepository,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
#[cfg(test)]
pub use webhook_admin::MockWebhookAdmin;
pub use webhook_admin::{TestDelivery, WebhookAdmin};
#[cfg(test)]
pub use webhook_config_repository::MockWebhookConfigRepository;
pub use webhook_config_repository::{WebhookConfigPersistenceError, WebhookConfigRepository};
#[cfg(test)]
pub use webhook_notifier::MockWebhookNotifier;
pub use webhook_notifier::{NoOpWebhookNotifier, WebhookNotifier};
#[cfg(test)]
pub use webhook_transport::MockWebhookTransport;
pub use webhook_transport::{WebhookTransport, WebhookTransportError};
