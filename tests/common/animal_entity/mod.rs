//! One `animals` table backing a small entity family: rows carry a `species`
//! discriminator and each species uses a different subset of the columns.

use model_controller::{ControllerError, ControllerResource, Discriminated, MergeIntoActiveModel};
use sea_orm::{NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub species: String,
    pub name: String,
    pub bark_volume: Option<i32>,
    pub lives_left: Option<i32>,
    pub vaccinated: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AnimalCreate {
    #[serde(default)]
    pub species: Option<String>,
    pub name: String,
    #[serde(default)]
    pub bark_volume: Option<i32>,
    #[serde(default)]
    pub lives_left: Option<i32>,
}

// Fallback conversion for controllers without a registry; species must be
// present or the insert fails on the NOT NULL column.
impl From<AnimalCreate> for ActiveModel {
    fn from(payload: AnimalCreate) -> Self {
        Self {
            id: NotSet,
            species: match payload.species {
                Some(species) => Set(species),
                None => NotSet,
            },
            name: Set(payload.name),
            bark_volume: match payload.bark_volume {
                Some(volume) => Set(Some(volume)),
                None => NotSet,
            },
            lives_left: match payload.lives_left {
                Some(lives) => Set(Some(lives)),
                None => NotSet,
            },
            vaccinated: NotSet,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AnimalUpdate {
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
    pub bark_volume: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "model_controller::serde_with::rust::double_option"
    )]
    pub lives_left: Option<Option<i32>>,
}

impl MergeIntoActiveModel<ActiveModel> for AnimalUpdate {
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
        existing.bark_volume = match self.bark_volume {
            Some(Some(value)) => Set(Some(value)),
            Some(None) => Set(None),
            None => NotSet,
        };
        existing.lives_left = match self.lives_left {
            Some(Some(value)) => Set(Some(value)),
            Some(None) => Set(None),
            None => NotSet,
        };
        Ok(existing)
    }
}

pub struct Animal;

impl ControllerResource for Animal {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = AnimalCreate;
    type UpdateModel = AnimalUpdate;

    const ID_COLUMN: Column = Column::Id;
    const ENTITY_NAME: &'static str = "Animal";
    const RESOURCE_NAME_SINGULAR: &str = "animal";
    const RESOURCE_NAME_PLURAL: &str = "animals";
}

/// Registry with two species: dogs never store `lives_left`, cats never store
/// `bark_volume`.
pub fn animal_registry() -> Discriminated<Animal> {
    Discriminated::new(
        |payload: &AnimalCreate| payload.species.clone(),
        |row: &Model| Some(row.species.clone()),
    )
    .variant("dog", |payload: AnimalCreate| ActiveModel {
        id: NotSet,
        species: Set("dog".to_string()),
        name: Set(payload.name),
        bark_volume: match payload.bark_volume {
            Some(volume) => Set(Some(volume)),
            None => NotSet,
        },
        lives_left: NotSet,
        vaccinated: NotSet,
    })
    .variant("cat", |payload: AnimalCreate| ActiveModel {
        id: NotSet,
        species: Set("cat".to_string()),
        name: Set(payload.name),
        bark_volume: NotSet,
        lives_left: match payload.lives_left {
            Some(lives) => Set(Some(lives)),
            None => NotSet,
        },
        vaccinated: NotSet,
    })
}
