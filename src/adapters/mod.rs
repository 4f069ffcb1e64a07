//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - User, course history and catalog persistence
//! - `redis` - Mutual-course cache
//! - `memory` - In-memory implementations of every port
//! - `data_quality` - Data-quality events to the structured log
//! - `term_clock` - Current-term providers

pub mod data_quality;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod term_clock;

pub use data_quality::TracingDataQualitySink;
pub use term_clock::{CalendarTermClock, FixedTermClock};
