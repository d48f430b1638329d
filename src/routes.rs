//! REST endpoints over a [`ModelController`], one router per resource.
//!
//! [`crud_router`] wires the five standard endpoints against a shared
//! [`CrudState`]; nest it under the resource's path prefix. List responses
//! carry Content-Range and X-Total-Count headers for range-aware clients.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use hyper::HeaderMap;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Value};

use crate::controller::ModelController;
use crate::errors::ControllerError;
use crate::filter::{FilterSchema, FilterSet};
use crate::models::ListParams;
use crate::pagination::PageLimits;
use crate::traits::{ControllerResource, ModelOf, PrimaryKeyOf};

/// Everything one resource's handlers need: the connection, the controller,
/// the derived filter schema, and the page limits.
pub struct CrudState<R: ControllerResource> {
    pub db: DatabaseConnection,
    pub controller: Arc<ModelController<R>>,
    pub schema: Arc<FilterSchema>,
    pub limits: PageLimits,
}

// Derived Clone would demand R: Clone, which marker resources never need.
impl<R: ControllerResource> Clone for CrudState<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            controller: Arc::clone(&self.controller),
            schema: Arc::clone(&self.schema),
            limits: self.limits,
        }
    }
}

impl<R: ControllerResource> CrudState<R> {
    /// State with the resource's derived filter schema and default page
    /// limits.
    #[must_use]
    pub fn new(db: DatabaseConnection, controller: Arc<ModelController<R>>) -> Self {
        Self {
            db,
            controller,
            schema: Arc::new(FilterSchema::of::<R>()),
            limits: PageLimits::default(),
        }
    }

    /// Replace the default page limits.
    #[must_use]
    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Router exposing the standard CRUD endpoints for one resource:
///
/// - `GET /` list, filterable and paginated
/// - `POST /` create
/// - `GET /{id}`, `PUT /{id}`, `DELETE /{id}` by primary key
///
/// The id path segment is parsed with the key type's `FromStr`, so the same
/// router serves integer and UUID keys alike.
#[must_use]
pub fn crud_router<R>() -> Router<CrudState<R>>
where
    R: ControllerResource,
    PrimaryKeyOf<R>: FromStr + Into<Value>,
{
    Router::new()
        .route("/", get(get_all::<R>).post(create_one::<R>))
        .route(
            "/{id}",
            get(get_one::<R>)
                .put(update_one::<R>)
                .delete(delete_one::<R>),
        )
}

fn parse_id<R>(raw: &str) -> Result<PrimaryKeyOf<R>, ControllerError>
where
    R: ControllerResource,
    PrimaryKeyOf<R>: FromStr,
{
    raw.parse().map_err(|_| {
        ControllerError::bad_request(format!("Invalid {} id '{raw}'", R::RESOURCE_NAME_SINGULAR))
    })
}

async fn get_all<R>(
    Query(params): Query<ListParams>,
    State(state): State<CrudState<R>>,
) -> Result<(HeaderMap, Json<Vec<ModelOf<R>>>), ControllerError>
where
    R: ControllerResource,
{
    let filter = params
        .filter
        .as_deref()
        .map(|document| FilterSet::parse(&state.schema, document))
        .transpose()?;
    let request = state.limits.resolve(params.page, params.per_page);
    let page = state
        .controller
        .get_page(&state.db, filter.as_ref(), Condition::all(), request)
        .await?;
    let headers = page.content_range(R::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(page.items)))
}

async fn get_one<R>(
    State(state): State<CrudState<R>>,
    Path(id): Path<String>,
) -> Result<Json<ModelOf<R>>, ControllerError>
where
    R: ControllerResource,
    PrimaryKeyOf<R>: FromStr + Into<Value>,
{
    let key = parse_id::<R>(&id)?;
    let row = state
        .controller
        .get_one(&state.db, R::ID_COLUMN.eq(key))
        .await?
        .ok_or_else(|| ControllerError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id)))?;
    Ok(Json(row))
}

async fn create_one<R>(
    State(state): State<CrudState<R>>,
    Json(payload): Json<R::CreateModel>,
) -> Result<(StatusCode, Json<ModelOf<R>>), ControllerError>
where
    R: ControllerResource,
{
    let row = state.controller.create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_one<R>(
    State(state): State<CrudState<R>>,
    Path(id): Path<String>,
    Json(payload): Json<R::UpdateModel>,
) -> Result<Json<ModelOf<R>>, ControllerError>
where
    R: ControllerResource,
    PrimaryKeyOf<R>: FromStr + Into<Value>,
{
    let key = parse_id::<R>(&id)?;
    let row = state
        .controller
        .get_one(&state.db, R::ID_COLUMN.eq(key))
        .await?
        .ok_or_else(|| ControllerError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id)))?;
    let updated = state
        .controller
        .update_object(&state.db, row, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_one<R>(
    State(state): State<CrudState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ControllerError>
where
    R: ControllerResource,
    PrimaryKeyOf<R>: FromStr + Into<Value>,
{
    let key = parse_id::<R>(&id)?;
    let row = state
        .controller
        .get_one(&state.db, R::ID_COLUMN.eq(key))
        .await?
        .ok_or_else(|| ControllerError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id.clone())))?;
    if state.controller.delete(&state.db, row).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ControllerError::not_found(
            R::RESOURCE_NAME_SINGULAR,
            Some(id),
        ))
    }
}
