//! Cover image stores - local disk and in-memory.

mod disk;
mod memory;

pub use disk::LocalBlobStore;
pub use memory::InMemoryBlobStore;
