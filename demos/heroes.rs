//! Minimal heroes CRUD API with Axum
//!
//! ```bash
//! cargo run --example heroes
//! ```
//!
//! Then visit <http://localhost:3000/heroes>. The list endpoint accepts the
//! derived filter fields as a JSON document plus standard pagination, e.g.
//! `/heroes?filter={"age_gt":100}&page=1&per_page=10`.

use std::sync::Arc;

use model_controller::{
    ControllerError, ControllerResource, CrudState, LoggingProcessor, MergeIntoActiveModel,
    ModelController, crud_router,
};
use sea_orm::{Database, DatabaseConnection, NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "heroes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub secret_name: String,
    pub age: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}
impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HeroCreate {
    pub name: String,
    pub secret_name: String,
    #[serde(default)]
    pub age: Option<i32>,
}

impl From<HeroCreate> for ActiveModel {
    fn from(payload: HeroCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(payload.name),
            secret_name: Set(payload.secret_name),
            age: match payload.age {
                Some(age) => Set(Some(age)),
                None => NotSet,
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct HeroUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "model_controller::serde_with::rust::double_option"
    )]
    pub name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "model_controller::serde_with::rust::double_option"
    )]
    pub secret_name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "model_controller::serde_with::rust::double_option"
    )]
    pub age: Option<Option<i32>>,
}

impl MergeIntoActiveModel<ActiveModel> for HeroUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: ActiveModel,
    ) -> Result<ActiveModel, ControllerError> {
        existing.name = match self.name {
            Some(Some(value)) => Set(value),
            Some(None) => {
                return Err(ControllerError::bad_request(
                    "Field 'name' is required and cannot be set to null",
                ));
            }
            None => NotSet,
        };
        existing.secret_name = match self.secret_name {
            Some(Some(value)) => Set(value),
            Some(None) => {
                return Err(ControllerError::bad_request(
                    "Field 'secret_name' is required and cannot be set to null",
                ));
            }
            None => NotSet,
        };
        existing.age = match self.age {
            Some(Some(value)) => Set(Some(value)),
            Some(None) => Set(None),
            None => NotSet,
        };
        Ok(existing)
    }
}

pub struct Hero;

impl ControllerResource for Hero {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = HeroCreate;
    type UpdateModel = HeroUpdate;

    const ID_COLUMN: Column = Column::Id;
    const ENTITY_NAME: &'static str = "Hero";
    const RESOURCE_NAME_SINGULAR: &str = "hero";
    const RESOURCE_NAME_PLURAL: &str = "heroes";
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS heroes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            secret_name TEXT NOT NULL,
            age INTEGER
        );"
        .to_owned(),
    ))
    .await?;

    let mut controller = ModelController::<Hero>::new();
    controller.register_processor(LoggingProcessor);
    let controller = Arc::new(controller);

    controller
        .create(
            &db,
            HeroCreate {
                name: "Deadpond".to_string(),
                secret_name: "Dive Wilson".to_string(),
                age: Some(121),
            },
        )
        .await?;
    controller
        .create(
            &db,
            HeroCreate {
                name: "Whateverest".to_string(),
                secret_name: "Morty Smith".to_string(),
                age: Some(1),
            },
        )
        .await?;

    let state = CrudState::new(db, controller);
    println!(
        "Filter schema {}: {:?}",
        state.schema.name(),
        state
            .schema
            .fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>()
    );

    let app = axum::Router::new().nest("/heroes", crud_router::<Hero>().with_state(state));
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("🚀 API: http://0.0.0.0:3000/heroes");
    axum::serve(listener, app).await?;
    Ok(())
}
