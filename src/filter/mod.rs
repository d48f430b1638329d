//! Filter schemas derived from entity column metadata, and filter sets parsed
//! against them.
//!
//! A [`FilterSchema`] describes which query fields an entity accepts: integer
//! columns contribute `<col>`, `<col>_lt` and `<col>_gt`, text columns
//! contribute `<col>` and `<col>_like`, and every other column type is
//! skipped. A [`FilterSet`] is a JSON filter document validated against a
//! schema, ready to be lowered into a Sea-ORM [`Condition`](sea_orm::Condition).

mod error;
mod schema;
mod set;

pub use error::FilterError;
pub use schema::{ColumnKind, FilterField, FilterOp, FilterSchema, FilterSchemaBuilder};
pub use set::{FilterClause, FilterSet, FilterValue};
