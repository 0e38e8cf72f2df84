pub mod manager;
pub mod memory;
pub mod models;
pub mod mysql;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{Fault, MemoryStore};
pub use mysql::MySqlStore;
pub use store::{Store, StoreError, StoreResult};
