//! Data-quality sink that writes events to the structured log.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::foundation::DomainError;
use crate::domain::user::DataQualityEvent;
use crate::ports::DataQualitySink;

/// Emits each event as a `warn` on the `coursemates::data_quality` target,
/// so it can be routed by the subscriber's filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDataQualitySink;

impl TracingDataQualitySink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataQualitySink for TracingDataQualitySink {
    async fn record(&self, event: DataQualityEvent) -> Result<(), DomainError> {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        warn!(
            target: "coursemates::data_quality",
            category = ?event.category(),
            event = event.name(),
            identifier = %event.identifier(),
            payload = %payload,
            "Data quality event"
        );
        Ok(())
    }
}
