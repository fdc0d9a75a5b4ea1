pub mod codec;
pub mod mysql;
pub mod state;
pub mod token;

pub use codec::SessionCodec;
pub use mysql::MySqlSessionStore;
pub use state::SessionState;
pub use token::SessionToken;
