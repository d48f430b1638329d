use async_trait::async_trait;

use super::{MutationEvent, Processor, ProcessorError};
use crate::traits::ControllerResource;

/// Processor that emits one `tracing` info event per mutation.
///
/// Purely observational: it never touches the data path and never fails.
/// Nothing is emitted unless the application installs a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProcessor;

#[async_trait]
impl<R: ControllerResource> Processor<R> for LoggingProcessor {
    async fn process(&self, event: &MutationEvent<'_, R>) -> Result<(), ProcessorError> {
        tracing::info!(
            operation = %event.operation,
            entity = event.entity,
            payload = ?event.payload,
            context = ?event.context,
            "model mutation"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LoggingProcessor"
    }
}
