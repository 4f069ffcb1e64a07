//! TermClock implementations.

use crate::domain::foundation::Timestamp;
use crate::domain::term::TermId;
use crate::ports::TermClock;

/// Derives the current term from the wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarTermClock;

impl TermClock for CalendarTermClock {
    fn current_term(&self) -> TermId {
        TermId::containing(&Timestamp::now())
    }
}

/// Always reports the same term. Used in tests and when the term is
/// pinned through configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedTermClock(TermId);

impl FixedTermClock {
    pub fn new(term: TermId) -> Self {
        Self(term)
    }
}

impl TermClock for FixedTermClock {
    fn current_term(&self) -> TermId {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_term() {
        let term: TermId = "2013_05".parse().unwrap();
        assert_eq!(FixedTermClock::new(term).current_term(), term);
    }

    #[test]
    fn calendar_clock_reports_a_concrete_term() {
        assert!(!CalendarTermClock.current_term().is_shortlist());
    }
}
