//! Object store client
//!
//! Uploads sender media to a WebDAV-style remote store over HTTP PUT with
//! Basic auth. Before uploading, the destination folder is probed with a
//! cheap PROPFIND so that credential and path problems surface as clear,
//! typed errors rather than a failed PUT.
//!
//! Retry policy belongs to the caller; nothing in this crate retries.

pub mod error;
pub mod traits;
pub mod webdav;

pub use error::{StorageError, StorageResult};
pub use traits::{ObjectStore, StoredObject};
pub use webdav::WebdavStore;
