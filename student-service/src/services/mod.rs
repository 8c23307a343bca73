pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoDb;
pub use memory::InMemoryStudentStore;
pub use self::metrics::{get_metrics, init_metrics, record_store_operation};
pub use store::{StoreError, StudentStore};
