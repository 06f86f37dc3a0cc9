//! SQLite backends for the TechPro site.
//!
//! - [`SqliteKv`]: the key/value host behind the site's record store. A
//!   single file plays the part of a browser profile's local storage.
//! - [`SqliteInbox`]: append-only storage for the contact intake service.
//!   Wraps [`tokio_rusqlite`] so database access runs on a dedicated thread
//!   without blocking the async runtime.

mod encode;
mod inbox;
mod kv;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use inbox::SqliteInbox;
pub use kv::SqliteKv;
