//! DataQualitySink port - destination for data-quality events.
//!
//! Recording is fire-and-forget from the caller's point of view: callers
//! log a failed `record` and carry on.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::user::DataQualityEvent;

#[async_trait]
pub trait DataQualitySink: Send + Sync {
    async fn record(&self, event: DataQualityEvent) -> Result<(), DomainError>;
}
