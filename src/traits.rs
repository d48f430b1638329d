use sea_orm::{IntoActiveModel, entity::prelude::*};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::errors::ControllerError;

/// Row type of the entity a resource is bound to.
pub type ModelOf<R> = <<R as ControllerResource>::EntityType as EntityTrait>::Model;

/// Primary key value type of the entity a resource is bound to.
pub type PrimaryKeyOf<R> =
    <<<R as ControllerResource>::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Applies the explicitly set fields of an update payload onto an existing
/// active model.
///
/// Fields left absent in the payload must stay `NotSet` so the update touches
/// only what the caller sent. An outer `Some(None)` on a nullable field sets
/// the column to NULL; on a required field it is rejected.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update payload into `existing`.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::BadRequest` when a required field is
    /// explicitly set to null.
    fn merge_into_activemodel(
        self,
        existing: ActiveModelType,
    ) -> Result<ActiveModelType, ControllerError>;
}

/// Binds a Sea-ORM entity, its payload types, and its naming constants into
/// one resource a [`ModelController`](crate::ModelController) can operate on.
///
/// Implementors are usually empty marker types; all the information lives in
/// the associated items.
pub trait ControllerResource: Sized + Send + Sync + 'static
where
    Self::EntityType: EntityTrait + Sync,
    Self::ActiveModelType: ActiveModelTrait<Entity = Self::EntityType> + ActiveModelBehavior + Send,
    <Self::EntityType as EntityTrait>::Model:
        IntoActiveModel<Self::ActiveModelType> + Clone + fmt::Debug + Serialize + Send + Sync,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: Into<Self::ActiveModelType>
        + DeserializeOwned
        + Clone
        + fmt::Debug
        + Send
        + Sync;
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType>
        + DeserializeOwned
        + Clone
        + fmt::Debug
        + Send
        + Sync;

    /// Column rows are ordered by on list queries.
    const ID_COLUMN: Self::ColumnType;
    /// Type-level entity name, as it appears in derived schema names and
    /// variant resolution errors (e.g. `"Hero"`).
    const ENTITY_NAME: &'static str;
    const RESOURCE_NAME_SINGULAR: &str;
    const RESOURCE_NAME_PLURAL: &str;
}
