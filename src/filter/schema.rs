use sea_orm::{ColumnTrait, ColumnType, IdenStatic, Iterable};
use std::fmt;

use crate::traits::ControllerResource;

/// Value family a filterable column belongs to.
///
/// Only integer and text columns participate in filter schemas; anything else
/// is skipped during derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Comparison a filter field applies to its base column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Gt,
    Like,
}

/// One accepted field of a filter schema.
///
/// `name` is what callers write in a filter document (`"age_lt"`); `column`
/// is the entity column the comparison lands on (`"age"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub name: String,
    pub column: String,
    pub op: FilterOp,
    pub kind: ColumnKind,
}

/// The set of filter fields an entity accepts, derived deterministically from
/// its column definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSchema {
    name: String,
    fields: Vec<FilterField>,
}

impl FilterSchema {
    /// Start building a schema by hand from (column, kind) pairs.
    ///
    /// `entity_name` is the type-level entity name; the schema is named
    /// `<entity_name>Filter`.
    #[must_use]
    pub fn builder(entity_name: &str) -> FilterSchemaBuilder {
        FilterSchemaBuilder {
            name: format!("{entity_name}Filter"),
            fields: Vec::new(),
        }
    }

    /// Derive the schema for a resource from its live column metadata.
    ///
    /// Iterates the entity's columns and feeds every integer or text column
    /// into the builder. Columns of any other type contribute nothing; there
    /// is no error path.
    #[must_use]
    pub fn of<R: ControllerResource>() -> Self {
        let mut builder = Self::builder(R::ENTITY_NAME);
        for column in R::ColumnType::iter() {
            let column_def = column.def();
            if let Some(kind) = classify_column_type(column_def.get_column_type()) {
                builder = builder.column(column.as_str(), kind);
            }
        }
        builder.build()
    }

    /// Schema name, `<EntityName>Filter`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Look up an accepted field by the name callers write in a document.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Builds a [`FilterSchema`] from explicit (column, kind) pairs.
///
/// This is the source-of-truth path; [`FilterSchema::of`] is a thin wrapper
/// feeding it from entity metadata. Field synthesis per column:
/// integer columns get `<col>`, `<col>_lt`, `<col>_gt`; text columns get
/// `<col>`, `<col>_like`.
#[derive(Debug, Clone)]
pub struct FilterSchemaBuilder {
    name: String,
    fields: Vec<FilterField>,
}

impl FilterSchemaBuilder {
    #[must_use]
    pub fn column(mut self, column: &str, kind: ColumnKind) -> Self {
        self.fields.push(FilterField {
            name: column.to_string(),
            column: column.to_string(),
            op: FilterOp::Eq,
            kind,
        });
        match kind {
            ColumnKind::Integer => {
                self.fields.push(FilterField {
                    name: format!("{column}_lt"),
                    column: column.to_string(),
                    op: FilterOp::Lt,
                    kind,
                });
                self.fields.push(FilterField {
                    name: format!("{column}_gt"),
                    column: column.to_string(),
                    op: FilterOp::Gt,
                    kind,
                });
            }
            ColumnKind::Text => {
                self.fields.push(FilterField {
                    name: format!("{column}_like"),
                    column: column.to_string(),
                    op: FilterOp::Like,
                    kind,
                });
            }
        }
        self
    }

    #[must_use]
    pub fn build(self) -> FilterSchema {
        FilterSchema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Map a Sea-ORM column type onto a filterable kind, or `None` for column
/// types that take no part in filtering.
fn classify_column_type(column_type: &ColumnType) -> Option<ColumnKind> {
    match column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => Some(ColumnKind::Integer),
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Some(ColumnKind::Text),
        _ => None,
    }
}
