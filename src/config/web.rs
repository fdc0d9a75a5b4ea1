//! # HTTP and CORS Configuration
//!
//! Listener, static-asset and CORS settings for the HTTP server. These are
//! embedded in [`AppConfig`](crate::config::app::AppConfig).
//!
//! # Examples
//! ```rust
//! use session_identity::config::web::{CorsConfig, HttpConfig};
//!
//! let http = HttpConfig {
//!     bind_addr: "127.0.0.1:4001".into(),
//!     static_dir: "client/build".into(),
//! };
//! let cors = CorsConfig {
//!     env: "http://localhost:3000".into(),
//!     credentials: true,
//! };
//!
//! assert_eq!(http.bind_addr, "127.0.0.1:4001");
//! assert!(cors.credentials);
//! ```

use std::path::PathBuf;

/// Default listen address; matches the port the client dev proxy expects.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4001";

/// Default location of the single-page client build.
pub const DEFAULT_STATIC_DIR: &str = "client/build";

/// HTTP listener configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Directory served as static files (the SPA build output).
    pub static_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// `env` is the raw comma-separated origin list from `CORS_ORIGINS`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CorsConfig {
    pub env: String,
    pub credentials: bool,
}
