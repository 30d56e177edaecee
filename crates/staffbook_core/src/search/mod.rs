//! Query descriptions for person lookups.
//!
//! # Responsibility
//! - Express field filters as plain data evaluated by a pure matcher.

pub mod filter;
