//! Progress reporting for pipeline runs

use crate::merge::Stage;
use async_trait::async_trait;

/// Receives stage transitions and human-readable updates
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A stage is about to be evaluated
    async fn on_stage(&self, stage: Stage);

    /// Free-form status message
    async fn on_message(&self, message: &str);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_stage(&self, _stage: Stage) {}

    async fn on_message(&self, _message: &str) {}
}
