pub mod avatar;
pub mod profile;
pub mod resolver;
pub mod secret;
pub mod user;

pub use avatar::avatar_url_for;
pub use profile::{AuthOutcome, Credentials, FederatedProfile};
pub use resolver::IdentityResolver;
pub use user::{AuthStrategy, UserId, UserRecord};
