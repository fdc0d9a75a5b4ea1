use std::sync::Arc;
use std::time::Duration;

use crate::auth::oauth::ProfileProvider;
use crate::identity::IdentityResolver;
use crate::session::SessionCodec;
use crate::store::UserStore;

/// Shared handler state.
///
/// Every field is cheap to clone; handlers receive a copy per request.
/// Session storage is not here: it sits in the `tower-sessions` layer.
#[derive(Clone)]
pub struct AppState {
    pub resolver: IdentityResolver,
    pub codec: SessionCodec,
    /// `None` disables the `/auth/github` routes.
    pub github: Option<Arc<dyn ProfileProvider>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        store_timeout: Duration,
        github: Option<Arc<dyn ProfileProvider>>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(users.clone(), store_timeout),
            codec: SessionCodec::new(users, store_timeout),
            github,
        }
    }
}
