//! Academic term identifiers.
//!
//! Terms are written `YYYY_MM`, where `MM` is the first month of the
//! four-month block the term covers: `01` (winter), `05` (spring) or
//! `09` (fall). The reserved value `9999_99` marks a shortlisted course that
//! has not been taken yet.
//!
//! Ordering is by recency. The shortlist sentinel is older than every
//! concrete term, so a real attempt always supersedes a placeholder and a
//! placeholder never supersedes a real attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::foundation::{Timestamp, ValidationError};

/// String form of the shortlist sentinel term.
pub const SHORTLIST_TERM: &str = "9999_99";

/// Months a term may start in.
const TERM_START_MONTHS: [u8; 3] = [1, 5, 9];

/// Identifier of an academic term, or the shortlist sentinel.
///
/// Variant order matters: the derived `Ord` ranks `Shortlist` below every
/// `Concrete` term, and concrete terms by `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TermId {
    Shortlist,
    Concrete { year: u16, month: u8 },
}

impl TermId {
    /// Creates a concrete term, validating the start month.
    pub fn concrete(year: u16, month: u8) -> Result<Self, ValidationError> {
        if !(1000..=9998).contains(&year) {
            return Err(ValidationError::invalid_format(
                "term_id",
                format!("year {} out of range", year),
            ));
        }
        if !TERM_START_MONTHS.contains(&month) {
            return Err(ValidationError::invalid_format(
                "term_id",
                format!("month {:02} does not start a term", month),
            ));
        }
        Ok(TermId::Concrete { year, month })
    }

    /// Returns the term containing the given instant.
    pub fn containing(at: &Timestamp) -> Self {
        let month = ((at.month() - 1) / 4) * 4 + 1;
        TermId::Concrete {
            year: at.year().clamp(1000, 9998) as u16,
            month: month as u8,
        }
    }

    /// Returns true for the shortlist sentinel.
    pub fn is_shortlist(&self) -> bool {
        matches!(self, TermId::Shortlist)
    }

    /// Returns true if this term is strictly more recent than `other`.
    pub fn is_more_recent_than(&self, other: &TermId) -> bool {
        self > other
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermId::Shortlist => write!(f, "{}", SHORTLIST_TERM),
            TermId::Concrete { year, month } => write!(f, "{:04}_{:02}", year, month),
        }
    }
}

impl FromStr for TermId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SHORTLIST_TERM {
            return Ok(TermId::Shortlist);
        }
        let (year, month) = s
            .split_once('_')
            .filter(|(y, m)| y.len() == 4 && m.len() == 2)
            .ok_or_else(|| ValidationError::invalid_format("term_id", "expected YYYY_MM"))?;
        let year: u16 = year
            .parse()
            .map_err(|_| ValidationError::invalid_format("term_id", "year is not a number"))?;
        let month: u8 = month
            .parse()
            .map_err(|_| ValidationError::invalid_format("term_id", "month is not a number"))?;
        TermId::concrete(year, month)
    }
}

impl TryFrom<String> for TermId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TermId> for String {
    fn from(term: TermId) -> Self {
        term.to_string()
    }
}
