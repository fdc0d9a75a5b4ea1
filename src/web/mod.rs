pub mod cors;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::build_router;
pub use session::SessionContext;
pub use state::AppState;
