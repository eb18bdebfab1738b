//! Document store access for Keyforge.
//!
//! This crate handles:
//! - The tagged-value wire format used by the document store
//! - A REST client for the store's document API
//! - An in-process store with the same merge semantics, for tests and local runs
//!
//! # Wire Format
//!
//! Every document is a wrapper object whose single key is `fields`. Each field
//! value is wrapped in a single-key object naming its type tag:
//!
//! ```json
//! {"fields": {"status": {"stringValue": "active"}, "seats": {"integerValue": "3"}}}
//! ```

pub mod codec;
mod error;
mod memory;
mod rest;
mod store;

pub use codec::{decode, encode, format_timestamp, DecodedFields, FieldValue, Fields};
pub use error::{CodecError, CodecResult, StoreError, StoreResult};
pub use memory::MemoryDocumentStore;
pub use rest::RestDocumentStore;
pub use store::{DocumentStore, StoreConfig};
