//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::Principal;
use crate::domain::ports::{
    MockAuthenticator, MockOrderCommand, MockOrderQuery, MockUsersCommand, MockUsersQuery,
    MockWebhookAdmin,
};
use crate::inbound::http::state::HttpState;

/// Bearer header value accepted by [`authenticating_as`].
pub const TEST_TOKEN: &str = "Bearer test-token";

/// Mocked ports for a handler under test; unset mocks reject every call.
#[derive(Default)]
pub struct TestPorts {
    pub authenticator: MockAuthenticator,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub webhooks: MockWebhookAdmin,
}

/// Build handler state from mocked ports.
pub fn test_state(ports: TestPorts) -> web::Data<HttpState> {
    web::Data::new(HttpState {
        authenticator: Arc::new(ports.authenticator),
        orders: Arc::new(ports.orders),
        orders_query: Arc::new(ports.orders_query),
        users: Arc::new(ports.users),
        users_query: Arc::new(ports.users_query),
        webhooks: Arc::new(ports.webhooks),
    })
}

/// Authenticator resolving any token to `principal`.
pub fn authenticating_as(principal: Principal) -> MockAuthenticator {
    let mut authenticator = MockAuthenticator::new();
    authenticator
        .expect_authenticate()
        .returning(move |_| Ok(Some(principal)));
    authenticator
}
