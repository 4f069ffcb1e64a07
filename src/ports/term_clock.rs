//! TermClock port - source of the current academic term.

use crate::domain::term::TermId;

/// Provides the current term to operations that compare against it.
pub trait TermClock: Send + Sync {
    fn current_term(&self) -> TermId;
}
