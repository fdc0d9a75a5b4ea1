pub mod oauth;

pub use oauth::{GithubProvider, ProfileProvider};
