//! Observers notified after successful mutations.
//!
//! A [`Processor`] receives one [`MutationEvent`] per create, update, or
//! delete, in registration order, awaited one at a time. Reads never notify.
//! An error from a processor aborts the remaining notifications and surfaces
//! out of the mutating operation; the database write has already happened at
//! that point, so rollback is the caller's concern.

mod logging;

pub use logging::LoggingProcessor;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::traits::{ControllerResource, ModelOf};

/// Kind of mutation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a mutation operated on: the create or update payload as the caller
/// sent it, or the row snapshot for deletes.
pub enum Payload<'a, R: ControllerResource> {
    Create(&'a R::CreateModel),
    Update(&'a R::UpdateModel),
    Row(&'a ModelOf<R>),
}

impl<R: ControllerResource> fmt::Debug for Payload<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(payload) => fmt::Debug::fmt(payload, f),
            Self::Update(payload) => fmt::Debug::fmt(payload, f),
            Self::Row(row) => fmt::Debug::fmt(row, f),
        }
    }
}

/// One successful mutation, as seen by processors.
pub struct MutationEvent<'a, R: ControllerResource> {
    pub operation: Operation,
    /// Concrete entity name: the resolved variant for polymorphic resources,
    /// the resource's entity name otherwise.
    pub entity: &'a str,
    pub payload: Payload<'a, R>,
    /// Context attached through a scope, or empty.
    pub context: &'a Context,
}

/// Failure raised by a processor, aborting the mutation's remaining
/// notifications.
#[derive(Debug)]
pub struct ProcessorError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProcessorError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProcessorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Observer invoked after each successful mutation of one resource.
#[async_trait]
pub trait Processor<R: ControllerResource>: Send + Sync {
    /// Handle one mutation event.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the remaining notifications and fails the
    /// mutating operation with `ControllerError::Processor`.
    async fn process(&self, event: &MutationEvent<'_, R>) -> Result<(), ProcessorError>;

    /// Name used when reporting a failure from this processor.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<R: ControllerResource, P: Processor<R> + ?Sized> Processor<R> for Arc<P> {
    async fn process(&self, event: &MutationEvent<'_, R>) -> Result<(), ProcessorError> {
        (**self).process(event).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
