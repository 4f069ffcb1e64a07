//! Academic term configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::term::TermId;

/// Term settings.
///
/// When `current_term` is set, it overrides the calendar-derived term.
/// Useful for backfills and for staging environments pinned to a term.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermConfig {
    #[serde(default)]
    pub current_term: Option<String>,
}

impl TermConfig {
    /// The pinned term, if any.
    pub fn fixed_term(&self) -> Result<Option<TermId>, ValidationError> {
        self.current_term
            .as_deref()
            .map(|raw| {
                let term: TermId = raw
                    .parse()
                    .map_err(|_| ValidationError::InvalidTerm(raw.to_string()))?;
                if term.is_shortlist() {
                    return Err(ValidationError::InvalidTerm(raw.to_string()));
                }
                Ok(term)
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fixed_term().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pinned_term_by_default() {
        assert_eq!(TermConfig::default().fixed_term().unwrap(), None);
    }

    #[test]
    fn pinned_term_is_parsed() {
        let config = TermConfig {
            current_term: Some("2013_05".to_string()),
        };
        assert_eq!(config.fixed_term().unwrap(), Some("2013_05".parse().unwrap()));
    }

    #[test]
    fn shortlist_cannot_be_current_term() {
        let config = TermConfig {
            current_term: Some("9999_99".to_string()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_term_is_rejected() {
        let config = TermConfig {
            current_term: Some("spring".to_string()),
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTerm(_))));
    }
}
