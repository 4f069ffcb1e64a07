//! Coursemates - course history and friend graph for a student social app.
//!
//! Records which courses each user has taken and in which term, keeps the
//! friend graph in sync with Facebook friend lists, and caches the set of
//! courses each pair of friends has in common.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
