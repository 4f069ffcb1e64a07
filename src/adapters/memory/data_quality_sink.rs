//! In-memory DataQualitySink that keeps every recorded event.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::user::DataQualityEvent;
use crate::ports::DataQualitySink;

#[derive(Default)]
pub struct InMemoryDataQualitySink {
    events: RwLock<Vec<DataQualityEvent>>,
    failing: AtomicBool,
}

impl InMemoryDataQualitySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `record` always fails.
    pub fn failing() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            failing: AtomicBool::new(true),
        }
    }

    pub async fn events(&self) -> Vec<DataQualityEvent> {
        self.events.read().await.clone()
    }

    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl DataQualitySink for InMemoryDataQualitySink {
    async fn record(&self, event: DataQualityEvent) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Event sink unavailable",
            ));
        }
        self.events.write().await.push(event);
        Ok(())
    }
}
