pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use pool::connect_and_migrate;
pub use postgres::PgStore;
pub use store::{AccountStore, JournalStore, StoreError, StoreResult};
