//! On-disk storage primitives for person records.
//!
//! # Responsibility
//! - Open the data root and prepare the type directories.
//! - Encode/decode record documents and replace files atomically.
//!
//! # Invariants
//! - The data root holds exactly one directory per `PersonType`.
//! - Record files are only ever replaced through `atomic::write_atomically`.

pub(crate) mod atomic;
pub mod codec;
mod open;

pub use codec::{decode_person, encode_person, CodecError};
pub use open::open_store;

/// File extension of record documents.
pub const RECORD_EXTENSION: &str = "xml";
