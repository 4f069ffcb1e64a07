//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors, timestamps)
//! - `term` - Academic term identifiers and their recency order
//! - `user` - User aggregate, course history entries, mutual-course pairs

pub mod foundation;
pub mod term;
pub mod user;
