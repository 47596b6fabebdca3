pub mod error;
pub mod record;

mod query;

mod local;
pub use local::LocalStore;
mod memory;
pub use memory::MemoryStore;

pub use error::StoreError;
pub use record::{Filter, Order, RecordStore};
