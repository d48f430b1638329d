use std::fmt;

use super::schema::ColumnKind;

/// Validation failure while parsing a filter document against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The document was not valid JSON, or not a JSON object
    InvalidDocument {
        /// Parser diagnostic or shape description
        detail: String,
    },

    /// A field in the document is not part of the schema
    UnknownField {
        /// Schema name, `<EntityName>Filter`
        schema: String,
        field: String,
    },

    /// A field carried a value of the wrong JSON type
    InvalidValue {
        field: String,
        /// Kind the schema expects for this field
        expected: ColumnKind,
        /// Short description of what the document carried
        found: String,
    },
}

impl FilterError {
    #[must_use]
    pub fn invalid_document(detail: impl Into<String>) -> Self {
        Self::InvalidDocument {
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn unknown_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    #[must_use]
    pub fn invalid_value(
        field: impl Into<String>,
        expected: ColumnKind,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDocument { detail } => {
                write!(f, "Invalid filter document: {detail}")
            }
            Self::UnknownField { schema, field } => {
                write!(f, "Unknown filter field '{field}' for {schema}")
            }
            Self::InvalidValue {
                field,
                expected,
                found,
            } => {
                write!(f, "Filter field '{field}' expects {expected}, got {found}")
            }
        }
    }
}

impl std::error::Error for FilterError {}
