//! Shared key-value store seam.
//!
//! All coordination state lives in an external, string-keyed store that
//! every member can reach. The [`backend::StoreBackend`] trait abstracts
//! that store; [`memory::InMemoryStore`] backs in-process tests and
//! simulations, [`local_fs::LocalFsStore`] is the crash-durable backend
//! that real window processes share through the file system.

pub mod backend;
pub mod local_fs;
pub mod memory;

pub use backend::{StoreBackend, StoreError};
pub use local_fs::LocalFsStore;
pub use memory::InMemoryStore;
