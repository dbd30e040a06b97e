//! Adapter and service wiring behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use super::ServerConfig;
use crate::domain::ports::{AttachmentStoreError, UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, OrderService, Role, User, UserId, UserService, WebhookService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::TokenDirectory;
use crate::outbound::files::CapStdAttachmentStore;
use crate::outbound::persistence::{
    MemoryOrderRepository, MemoryUserRepository, MemoryWebhookConfigRepository,
};
use crate::outbound::webhooks::{ReqwestWebhookTransport, WebhookDispatcher};
use crate::settings::BootstrapAdmin;

const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

/// Raised when the portal cannot be assembled.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("attachment storage: {0}")]
    Storage(#[from] AttachmentStoreError),
    #[error("webhook transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bootstrap administrator: {0}")]
    Bootstrap(String),
}

impl From<UserPersistenceError> for StartupError {
    fn from(value: UserPersistenceError) -> Self {
        Self::Bootstrap(value.to_string())
    }
}

/// Wired HTTP state plus the handles needed to manage accounts and tokens
/// outside the request path.
#[derive(Clone)]
pub struct Portal {
    pub http_state: web::Data<HttpState>,
    pub users: Arc<MemoryUserRepository>,
    pub tokens: Arc<TokenDirectory<MemoryUserRepository>>,
}

async fn bootstrap_admin(
    users: &MemoryUserRepository,
    tokens: &TokenDirectory<MemoryUserRepository>,
    admin: &BootstrapAdmin,
    now: DateTime<Utc>,
) -> Result<(), StartupError> {
    let user_id = match users.find_by_email(&admin.email).await? {
        Some(existing) => {
            if existing.role() != Role::Admin {
                warn!(
                    email = %admin.email,
                    role = %existing.role(),
                    "bootstrap token registered for a non-admin account"
                );
            }
            *existing.id()
        }
        None => {
            let name = DisplayName::new(BOOTSTRAP_ADMIN_NAME)
                .map_err(|err| StartupError::Bootstrap(err.to_string()))?;
            let user = User::new(UserId::random(), name, admin.email.clone(), Role::Admin, now);
            users.insert(&user).await?;
            info!(email = %admin.email, user_id = %user.id(), "bootstrap administrator created");
            *user.id()
        }
    };
    tokens.register(admin.token.clone(), user_id).await;
    Ok(())
}

/// Build every adapter and service and start the webhook worker.
///
/// Must run inside a Tokio runtime.
pub async fn build_portal(config: &ServerConfig) -> Result<Portal, StartupError> {
    let clock = Arc::clone(&config.clock);

    let users = Arc::new(MemoryUserRepository::new());
    let orders = Arc::new(MemoryOrderRepository::new());
    let webhook_configs = Arc::new(MemoryWebhookConfigRepository::new());
    let store = Arc::new(CapStdAttachmentStore::open(&config.upload_dir)?);
    let transport = Arc::new(ReqwestWebhookTransport::new(
        config.webhook_delivery.timeout,
    )?);

    let webhooks = Arc::new(WebhookService::new(
        webhook_configs,
        transport,
        Arc::clone(&clock),
    ));
    let dispatcher = WebhookDispatcher::spawn(
        Arc::clone(&webhooks),
        config.webhook_delivery.queue_capacity,
    );
    let order_service = Arc::new(OrderService::new(
        orders,
        store,
        Arc::new(dispatcher),
        config.attachment_policy.clone(),
        Arc::clone(&clock),
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&users), Arc::clone(&clock)));
    let tokens = Arc::new(TokenDirectory::new(Arc::clone(&users)));

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_admin(&users, &tokens, admin, clock.utc()).await?;
    }

    let http_state = web::Data::new(HttpState {
        authenticator: tokens.clone(),
        orders: order_service.clone(),
        orders_query: order_service,
        users: user_service.clone(),
        users_query: user_service,
        webhooks,
    });

    Ok(Portal {
        http_state,
        users,
        tokens,
    })
}
