//! Profile storage.
//!
//! `ProfileStore` is the repository contract; `InMemoryProfileStore` is
//! always available, the directory-backed store needs the `persistent`
//! feature.

mod memory;
mod traits;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use memory::InMemoryProfileStore;
pub use traits::{ProfileStore, StorageError};
