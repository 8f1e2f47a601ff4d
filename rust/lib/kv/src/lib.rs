pub mod error;
pub mod memory;
pub mod record;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryKV;
pub use record::Record;
pub use crate::redb::RedbStore;
pub use traits::KVStore;
