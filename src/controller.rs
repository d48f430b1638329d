//! The generic CRUD façade.
//!
//! A [`ModelController`] is bound to one resource and exposes query, create,
//! update and delete operations over any Sea-ORM connection. It holds no
//! connection and no per-request state: the connection is an argument to every
//! operation, and a processor context is attached through a short-lived
//! [`ScopedController`] rather than stored on the controller. A controller is
//! immutable once set up, so one instance behind an `Arc` serves any number of
//! concurrent callers.
//!
//! Mutations notify the registered [`Processor`]s in registration order after
//! the database write; reads never notify. For entity families stored in one
//! table, a [`Discriminated`] registry maps discriminator values to concrete
//! variants at `create` time.

use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Select, sea_query::IntoCondition,
};

use crate::context::{Context, EMPTY_CONTEXT};
use crate::errors::ControllerError;
use crate::filter::FilterSet;
use crate::pagination::{Page, PageRequest};
use crate::processor::{MutationEvent, Operation, Payload, Processor};
use crate::traits::{ControllerResource, MergeIntoActiveModel, ModelOf};

type PayloadAccessor<R> =
    Box<dyn Fn(&<R as ControllerResource>::CreateModel) -> Option<String> + Send + Sync>;
type RowAccessor<R> = Box<dyn Fn(&ModelOf<R>) -> Option<String> + Send + Sync>;
type VariantConverter<R> = Box<
    dyn Fn(<R as ControllerResource>::CreateModel) -> <R as ControllerResource>::ActiveModelType
        + Send
        + Sync,
>;

struct Variant<R: ControllerResource> {
    identity: String,
    convert: VariantConverter<R>,
}

/// Registry mapping discriminator values to concrete variants of an entity
/// family.
///
/// Populated once at controller construction: `create` resolves the payload's
/// discriminator against the registered identities and converts through the
/// matching entry, and update/delete events name the concrete variant by
/// reading the discriminator back out of the row. Registration order is
/// declaration order; lookup is exact string match.
pub struct Discriminated<R: ControllerResource> {
    payload_discriminator: PayloadAccessor<R>,
    row_discriminator: RowAccessor<R>,
    variants: Vec<Variant<R>>,
}

impl<R: ControllerResource> Discriminated<R> {
    /// Start a registry from the two discriminator accessors: one reading the
    /// value out of a create payload, one reading it out of a stored row.
    #[must_use]
    pub fn new(
        payload_discriminator: impl Fn(&R::CreateModel) -> Option<String> + Send + Sync + 'static,
        row_discriminator: impl Fn(&ModelOf<R>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            payload_discriminator: Box::new(payload_discriminator),
            row_discriminator: Box::new(row_discriminator),
            variants: Vec::new(),
        }
    }

    /// Register one variant: payloads whose discriminator equals `identity`
    /// are converted through `convert`.
    #[must_use]
    pub fn variant(
        mut self,
        identity: impl Into<String>,
        convert: impl Fn(R::CreateModel) -> R::ActiveModelType + Send + Sync + 'static,
    ) -> Self {
        self.variants.push(Variant {
            identity: identity.into(),
            convert: Box::new(convert),
        });
        self
    }

    /// Resolve a create payload to its variant identity and active model.
    fn resolve(
        &self,
        payload: &R::CreateModel,
    ) -> Result<(&str, R::ActiveModelType), ControllerError> {
        let Some(value) = (self.payload_discriminator)(payload) else {
            return Err(ControllerError::unresolved_variant(R::ENTITY_NAME, None));
        };
        let Some(variant) = self
            .variants
            .iter()
            .find(|variant| variant.identity == value)
        else {
            return Err(ControllerError::unresolved_variant(
                R::ENTITY_NAME,
                Some(value),
            ));
        };
        Ok((variant.identity.as_str(), (variant.convert)(payload.clone())))
    }

    /// Name the concrete variant of a stored row, or `None` when the row's
    /// discriminator matches no registered identity.
    fn row_name(&self, row: &ModelOf<R>) -> Option<&str> {
        let value = (self.row_discriminator)(row)?;
        self.variants
            .iter()
            .find(|variant| variant.identity == value)
            .map(|variant| variant.identity.as_str())
    }
}

/// Generic CRUD controller bound to one resource.
///
/// Construct with [`ModelController::new`] for a plain entity or
/// [`ModelController::discriminated`] for an entity family, register
/// processors, then share freely; all operations take `&self`.
pub struct ModelController<R: ControllerResource> {
    registry: Option<Discriminated<R>>,
    processors: Vec<Box<dyn Processor<R>>>,
}

impl<R: ControllerResource> Default for ModelController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ControllerResource> ModelController<R> {
    /// Controller for a plain (non-polymorphic) resource.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            processors: Vec::new(),
        }
    }

    /// Controller for an entity family, creating rows through `registry`.
    #[must_use]
    pub fn discriminated(registry: Discriminated<R>) -> Self {
        Self {
            registry: Some(registry),
            processors: Vec::new(),
        }
    }

    /// Append a processor to the notification list.
    ///
    /// Processors are invoked in registration order on every successful
    /// mutation. No deduplication and no removal: registering the same
    /// processor twice notifies it twice.
    pub fn register_processor(&mut self, processor: impl Processor<R> + 'static) {
        self.processors.push(Box::new(processor));
    }

    /// Attach a context mapping to mutations issued through the returned
    /// scope.
    ///
    /// The controller itself keeps no context state: processors observe
    /// `context` only for mutations going through the scope, and an empty
    /// mapping for mutations issued directly on the controller. Dropping the
    /// scope discards the mapping, so overlapping scopes on one shared
    /// controller cannot interfere with each other.
    #[must_use]
    pub fn set_context(&self, context: Context) -> ScopedController<'_, R> {
        ScopedController {
            controller: self,
            context,
        }
    }

    fn select(&self, filter: Option<&FilterSet>, condition: Condition) -> Select<R::EntityType> {
        let mut query = R::EntityType::find().filter(condition);
        if let Some(filter) = filter {
            query = query.filter(filter.condition());
        }
        query
    }

    /// Retrieve the first row matching `condition`, or `None`.
    ///
    /// The condition is passed through to Sea-ORM untouched; zero matches is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Database` when the query fails.
    pub async fn get_one<C>(
        &self,
        db: &C,
        condition: impl IntoCondition,
    ) -> Result<Option<ModelOf<R>>, ControllerError>
    where
        C: ConnectionTrait,
    {
        let row = R::EntityType::find().filter(condition).one(db).await?;
        Ok(row)
    }

    /// Retrieve all rows matching the pass-through `condition` and, when
    /// supplied, every clause of `filter`, ordered by the id column.
    ///
    /// Reads never notify processors.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Database` when the query fails.
    pub async fn get_many<C>(
        &self,
        db: &C,
        filter: Option<&FilterSet>,
        condition: Condition,
    ) -> Result<Vec<ModelOf<R>>, ControllerError>
    where
        C: ConnectionTrait,
    {
        let rows = self
            .select(filter, condition)
            .order_by_asc(R::ID_COLUMN)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Retrieve one page of rows matching `condition` and `filter`, ordered
    /// by the id column, together with the total item and page counts.
    ///
    /// A page index past the last page yields an empty item list, not an
    /// error. Reads never notify processors.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Database` when a query fails.
    pub async fn get_page<C>(
        &self,
        db: &C,
        filter: Option<&FilterSet>,
        condition: Condition,
        request: PageRequest,
    ) -> Result<Page<ModelOf<R>>, ControllerError>
    where
        C: ConnectionTrait,
    {
        let per_page = request.per_page.max(1);
        let paginator = self
            .select(filter, condition)
            .order_by_asc(R::ID_COLUMN)
            .paginate(db, per_page);
        let totals = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(request.page).await?;
        Ok(Page {
            items,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
            page: request.page,
            per_page,
        })
    }

    /// Create a row from `payload` and return it with generated columns
    /// populated.
    ///
    /// Unset optional payload fields stay out of the insert, so their columns
    /// fall back to the database default. With a registry configured, the
    /// payload's discriminator picks the concrete variant before any database
    /// work. Processors are notified with the create payload after the write.
    ///
    /// # Errors
    ///
    /// - `ControllerError::UnresolvedVariant` when a registry is configured
    ///   and the payload's discriminator is missing or matches no variant
    /// - `ControllerError::Database` when the insert fails
    /// - `ControllerError::Processor` when a processor rejects the event
    pub async fn create<C>(
        &self,
        db: &C,
        payload: R::CreateModel,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.create_in_context(db, payload, &EMPTY_CONTEXT).await
    }

    /// Apply every explicitly-set field of `payload` onto `row` and return
    /// the updated row.
    ///
    /// An explicit null in the payload sets the column to NULL; an absent
    /// field leaves it untouched. Processors are notified with the update
    /// payload after the write.
    ///
    /// # Errors
    ///
    /// - `ControllerError::BadRequest` when a required field is explicitly
    ///   set to null
    /// - `ControllerError::Database` when the update fails
    /// - `ControllerError::Processor` when a processor rejects the event
    pub async fn update_object<C>(
        &self,
        db: &C,
        row: ModelOf<R>,
        payload: R::UpdateModel,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.update_in_context(db, row, payload, &EMPTY_CONTEXT)
            .await
    }

    /// Delete `row` and report whether a row was actually deleted.
    ///
    /// Deleting a row that is already gone returns `Ok(false)`, not an
    /// error. Processors are notified with the row snapshot after the write.
    ///
    /// # Errors
    ///
    /// - `ControllerError::Database` when the delete fails
    /// - `ControllerError::Processor` when a processor rejects the event
    pub async fn delete<C>(&self, db: &C, row: ModelOf<R>) -> Result<bool, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.delete_in_context(db, row, &EMPTY_CONTEXT).await
    }

    async fn create_in_context<C>(
        &self,
        db: &C,
        payload: R::CreateModel,
        context: &Context,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        let (entity_name, active_model) = match &self.registry {
            Some(registry) => registry.resolve(&payload)?,
            None => (R::ENTITY_NAME, payload.clone().into()),
        };
        let row = active_model.insert(db).await?;
        tracing::debug!(entity = entity_name, "created one row");
        self.notify(
            Operation::Create,
            entity_name,
            Payload::Create(&payload),
            context,
        )
        .await?;
        Ok(row)
    }

    async fn update_in_context<C>(
        &self,
        db: &C,
        row: ModelOf<R>,
        payload: R::UpdateModel,
        context: &Context,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        let entity_name = self.concrete_name(&row);
        let existing = row.into_active_model();
        let merged = payload.clone().merge_into_activemodel(existing)?;
        let updated = merged.update(db).await?;
        tracing::debug!(entity = entity_name, "updated one row");
        self.notify(
            Operation::Update,
            entity_name,
            Payload::Update(&payload),
            context,
        )
        .await?;
        Ok(updated)
    }

    async fn delete_in_context<C>(
        &self,
        db: &C,
        row: ModelOf<R>,
        context: &Context,
    ) -> Result<bool, ControllerError>
    where
        C: ConnectionTrait,
    {
        let entity_name = self.concrete_name(&row);
        let result = row.clone().into_active_model().delete(db).await?;
        tracing::debug!(
            entity = entity_name,
            rows_affected = result.rows_affected,
            "deleted one row"
        );
        self.notify(Operation::Delete, entity_name, Payload::Row(&row), context)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Concrete entity name of a stored row: the registered variant identity
    /// when a registry is configured and matches, the base entity name
    /// otherwise. Rows with an unregistered discriminator fall back to the
    /// base name rather than failing.
    fn concrete_name(&self, row: &ModelOf<R>) -> &str {
        self.registry
            .as_ref()
            .and_then(|registry| registry.row_name(row))
            .unwrap_or(R::ENTITY_NAME)
    }

    async fn notify(
        &self,
        operation: Operation,
        entity: &str,
        payload: Payload<'_, R>,
        context: &Context,
    ) -> Result<(), ControllerError> {
        let event = MutationEvent {
            operation,
            entity,
            payload,
            context,
        };
        for processor in &self.processors {
            processor
                .process(&event)
                .await
                .map_err(|source| ControllerError::processor(processor.name(), source))?;
        }
        Ok(())
    }
}

/// Borrow of a controller carrying a context mapping for the mutations issued
/// through it.
///
/// Created by [`ModelController::set_context`]. The scope exposes the three
/// mutating operations with identical behavior to the controller's own,
/// except that processors observe the scope's context instead of an empty
/// one. Reads are unaffected by context and stay on the controller.
pub struct ScopedController<'c, R: ControllerResource> {
    controller: &'c ModelController<R>,
    context: Context,
}

impl<R: ControllerResource> ScopedController<'_, R> {
    /// The mapping processors observe for mutations issued through this
    /// scope.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// [`ModelController::create`] with this scope's context.
    ///
    /// # Errors
    ///
    /// Same as [`ModelController::create`].
    pub async fn create<C>(
        &self,
        db: &C,
        payload: R::CreateModel,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.controller
            .create_in_context(db, payload, &self.context)
            .await
    }

    /// [`ModelController::update_object`] with this scope's context.
    ///
    /// # Errors
    ///
    /// Same as [`ModelController::update_object`].
    pub async fn update_object<C>(
        &self,
        db: &C,
        row: ModelOf<R>,
        payload: R::UpdateModel,
    ) -> Result<ModelOf<R>, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.controller
            .update_in_context(db, row, payload, &self.context)
            .await
    }

    /// [`ModelController::delete`] with this scope's context.
    ///
    /// # Errors
    ///
    /// Same as [`ModelController::delete`].
    pub async fn delete<C>(&self, db: &C, row: ModelOf<R>) -> Result<bool, ControllerError>
    where
        C: ConnectionTrait,
    {
        self.controller
            .delete_in_context(db, row, &self.context)
            .await
    }
}
