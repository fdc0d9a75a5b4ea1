pub mod memory;
pub mod mysql;
pub mod port;

pub use memory::MemoryUserStore;
pub use mysql::MySqlUserStore;
pub use port::{with_timeout, StoreError, UserStore};
