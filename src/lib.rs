pub mod context;
pub mod controller;
pub mod errors;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod processor;
pub mod routes;
pub mod traits;

pub use context::Context;
pub use controller::{Discriminated, ModelController, ScopedController};
pub use errors::ControllerError;
pub use filter::{ColumnKind, FilterError, FilterSchema, FilterSet};
pub use models::ListParams;
pub use pagination::{Page, PageLimits, PageRequest};
pub use processor::{
    LoggingProcessor, MutationEvent, Operation, Payload, Processor, ProcessorError,
};
pub use routes::{CrudState, crud_router};
pub use serde_with;
pub use traits::{ControllerResource, MergeIntoActiveModel};
