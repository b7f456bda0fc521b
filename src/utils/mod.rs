//! Generic utility primitives with zero domain knowledge.
//!
//! - `token` - Token names and `key=value` assignments
//! - `validation` - Input validation helpers

pub mod token;
pub mod validation;
