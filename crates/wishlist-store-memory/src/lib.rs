//! In-memory backend for the wishlist store.
//!
//! State lives for as long as the process does; nothing is written to disk.

mod store;

pub use store::MemoryStore;
