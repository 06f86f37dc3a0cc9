//! Core types and logic for the TechPro site: the key/value persistence
//! adapter, typed record collections, the session gate and the contact
//! submission pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage hosts implement [`kv::KvStore`]; remote delivery is abstracted
//! behind [`submission::Courier`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod collection;
pub mod error;
pub mod export;
pub mod inbox;
pub mod kv;
pub mod model;
pub mod records;
pub mod seed;
pub mod session;
pub mod submission;

pub use error::{AuthError, Error, Result};
pub use records::RecordStore;
pub use session::SessionGate;
