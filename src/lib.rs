//! # session_identity
//!
//! Session-based authentication for a single-page web client: federated
//! login through GitHub, local id + password accounts, and a server-side
//! session that holds nothing but the canonical user id.
//!
//! - [`identity`]: canonical ids, user records and the [`IdentityResolver`]
//! - [`session`]: id-only session tokens, the [`SessionCodec`] and the
//!   MySQL-backed `tower-sessions` store
//! - [`store`]: the [`UserStore`] port with in-memory and MySQL adapters
//! - [`web`]: axum router, session extractor and HTTP error mapping
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use session_identity::{IdentityResolver, MemoryUserStore, SessionCodec};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryUserStore::new());
//! let resolver = IdentityResolver::new(store.clone(), Duration::from_secs(2));
//! let codec = SessionCodec::new(store, Duration::from_secs(2));
//!
//! let alice = resolver.create("alice", "secret1").await.unwrap();
//! let token = codec.encode(&alice);
//! assert_eq!(codec.decode(&token).await.unwrap(), alice);
//! # });
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use chrono;
pub use mysql;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tower_sessions;

// ===============================
// Public modules
// ===============================
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod session;
pub mod store;
pub mod time;
pub mod web;

pub use error::AuthError;
pub use identity::{AuthOutcome, Credentials, FederatedProfile, IdentityResolver, UserId, UserRecord};
pub use session::{SessionCodec, SessionState, SessionToken};
pub use store::{MemoryUserStore, StoreError, UserStore};
