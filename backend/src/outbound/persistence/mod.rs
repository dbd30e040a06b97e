//! In-memory persistence adapters.
//!
//! These adapters implement the domain repository ports with process-local
//! maps guarded by `tokio::sync::RwLock`. Each port method takes the lock once,
//! so a mutation and the ledger entry describing it become visible together.
//! They contain no business logic; visibility scopes and status filters are
//! evaluated with the domain's own predicates.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use order_portal::outbound::persistence::{MemoryOrderRepository, MemoryUserRepository};
//!
//! let orders = Arc::new(MemoryOrderRepository::new());
//! let users = Arc::new(MemoryUserRepository::new());
//! # let _ = (orders, users);
//! ```

mod memory_order_repository;
mod memory_user_repository;
mod memory_webhook_config_repository;

pub use memory_order_repository::MemoryOrderRepository;
pub use memory_user_repository::MemoryUserRepository;
pub use memory_webhook_config_repository::MemoryWebhookConfigRepository;
