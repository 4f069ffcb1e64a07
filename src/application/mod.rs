//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers orchestrate domain operations over the ports. `UserLifecycle`
//! wires them together for callers that want a single entry point.

pub mod course_ids;
pub mod handlers;
pub mod lifecycle;

pub use course_ids::CourseIdMemo;
pub use handlers::*;
pub use lifecycle::{LifecyclePorts, UserLifecycle};
