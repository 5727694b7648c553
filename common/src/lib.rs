//! Prime Exchange Common Types
//!
//! Shared types used across the converter crates: the supported currency
//! set, currency pairs, monetary amounts and cycle identifiers.

pub mod identifiers;
pub mod monetary;
pub mod error;

pub use identifiers::*;
pub use monetary::*;
pub use error::*;
