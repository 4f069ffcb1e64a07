//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` is the context that flows through command processing.
//! Handlers record it on their tracing span so that the writes performed on
//! behalf of one request (or one batch run) can be correlated in the logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user on whose behalf the command runs, if any.
    /// Batch jobs run without an actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    actor: Option<UserId>,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "cli", "aggregator").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates empty command metadata.
    pub fn new() -> Self {
        Self {
            actor: None,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Set the acting user.
    pub fn with_actor(mut self, user_id: UserId) -> Self {
        self.actor = Some(user_id);
        self
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the acting user if set.
    pub fn actor(&self) -> Option<&UserId> {
        self.actor.as_ref()
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl Default for CommandMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_empty_metadata() {
        let metadata = CommandMetadata::new();

        assert!(metadata.actor().is_none());
        assert!(metadata.source().is_none());
    }

    #[test]
    fn builder_chain_sets_all_fields() {
        let user_id = UserId::new();
        let metadata = CommandMetadata::new()
            .with_actor(user_id)
            .with_correlation_id("corr-123")
            .with_source("cli");

        assert_eq!(metadata.actor(), Some(&user_id));
        assert_eq!(metadata.correlation_id(), "corr-123");
        assert_eq!(metadata.source(), Some("cli"));
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let metadata = CommandMetadata::new();
        assert!(!metadata.correlation_id().is_empty());
    }
}
