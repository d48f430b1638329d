use axum::Router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use std::sync::{Arc, Mutex};

use model_controller::{
    Context, ControllerResource, CrudState, ModelController, MutationEvent, Processor,
    ProcessorError, crud_router,
};

pub mod animal_entity;

use animal_entity::{Animal, animal_registry};
use gadget_entity::Gadget;
use hero_entity::Hero;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_hero_app(db: DatabaseConnection) -> Router {
    setup_hero_app_with(db, ModelController::new())
}

pub fn setup_hero_app_with(db: DatabaseConnection, controller: ModelController<Hero>) -> Router {
    let api = Router::new().nest(
        "/heroes",
        crud_router::<Hero>().with_state(CrudState::new(db, Arc::new(controller))),
    );

    Router::new().nest("/api/v1", api)
}

pub fn setup_animal_app(db: DatabaseConnection) -> Router {
    let controller = ModelController::discriminated(animal_registry());
    let api = Router::new().nest(
        "/animals",
        crud_router::<Animal>().with_state(CrudState::new(db, Arc::new(controller))),
    );

    Router::new().nest("/api/v1", api)
}

pub fn setup_gadget_app(db: DatabaseConnection) -> Router {
    let api = Router::new().nest(
        "/gadgets",
        crud_router::<Gadget>().with_state(CrudState::new(db, Arc::new(ModelController::new()))),
    );

    Router::new().nest("/api/v1", api)
}

/// One mutation event flattened into owned data for assertions.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub operation: String,
    pub entity: String,
    pub payload: String,
    pub context: Context,
}

/// Processor that records every event it sees; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingProcessor {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingProcessor {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .expect("Failed to lock recorded events")
            .clone()
    }
}

#[async_trait::async_trait]
impl<R: ControllerResource> Processor<R> for RecordingProcessor {
    async fn process(&self, event: &MutationEvent<'_, R>) -> Result<(), ProcessorError> {
        self.events
            .lock()
            .expect("Failed to lock recorded events")
            .push(RecordedEvent {
                operation: event.operation.to_string(),
                entity: event.entity.to_string(),
                payload: format!("{:?}", event.payload),
                context: event.context.clone(),
            });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordingProcessor"
    }
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateHeroesTable),
            Box::new(CreateAnimalsTable),
            Box::new(CreateGadgetsTable),
        ]
    }
}

pub struct CreateHeroesTable;

#[async_trait::async_trait]
impl MigrationName for CreateHeroesTable {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_heroes_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateHeroesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(HeroesTable)
            .if_not_exists()
            .col(
                ColumnDef::new(HeroColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(HeroColumn::Name).text().not_null())
            .col(ColumnDef::new(HeroColumn::SecretName).text().not_null())
            .col(ColumnDef::new(HeroColumn::Age).integer().null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HeroesTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum HeroColumn {
    Id,
    Name,
    SecretName,
    Age,
}

impl Iden for HeroColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::SecretName => "secret_name",
                Self::Age => "age",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct HeroesTable;

impl Iden for HeroesTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "heroes").unwrap();
    }
}

pub struct CreateAnimalsTable;

#[async_trait::async_trait]
impl MigrationName for CreateAnimalsTable {
    fn name(&self) -> &'static str {
        "m20250101_000002_create_animals_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateAnimalsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(AnimalsTable)
            .if_not_exists()
            .col(
                ColumnDef::new(AnimalColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(AnimalColumn::Species).text().not_null())
            .col(ColumnDef::new(AnimalColumn::Name).text().not_null())
            .col(ColumnDef::new(AnimalColumn::BarkVolume).integer().null())
            .col(ColumnDef::new(AnimalColumn::LivesLeft).integer().null())
            .col(
                ColumnDef::new(AnimalColumn::Vaccinated)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnimalsTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum AnimalColumn {
    Id,
    Species,
    Name,
    BarkVolume,
    LivesLeft,
    Vaccinated,
}

impl Iden for AnimalColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Species => "species",
                Self::Name => "name",
                Self::BarkVolume => "bark_volume",
                Self::LivesLeft => "lives_left",
                Self::Vaccinated => "vaccinated",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct AnimalsTable;

impl Iden for AnimalsTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "animals").unwrap();
    }
}

pub struct CreateGadgetsTable;

#[async_trait::async_trait]
impl MigrationName for CreateGadgetsTable {
    fn name(&self) -> &'static str {
        "m20250101_000003_create_gadgets_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateGadgetsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(GadgetsTable)
            .if_not_exists()
            .col(ColumnDef::new(GadgetColumn::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(GadgetColumn::Name).text().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GadgetsTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum GadgetColumn {
    Id,
    Name,
}

impl Iden for GadgetColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct GadgetsTable;

impl Iden for GadgetsTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "gadgets").unwrap();
    }
}
