use sea_orm::{
    Condition,
    sea_query::{Alias, Expr},
};

use super::error::FilterError;
use super::schema::{ColumnKind, FilterOp, FilterSchema};

/// Typed value carried by one filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

impl FilterValue {
    fn to_value(&self) -> sea_orm::Value {
        match self {
            Self::Int(value) => (*value).into(),
            Self::Text(value) => value.clone().into(),
        }
    }
}

/// One validated comparison: `column op value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub column: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// A filter document validated against a [`FilterSchema`].
///
/// Parsing resolves each document field to its base column and comparison
/// once, so suffixed names like `age_lt` never reach query construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    /// Parse a JSON filter document against `schema`.
    ///
    /// Fields set to JSON `null` are treated as absent and skipped. Clauses
    /// follow the parsed object's iteration order, not the document's field
    /// order.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidDocument`] when the text is not a JSON object
    /// - [`FilterError::UnknownField`] when a field is not in the schema
    /// - [`FilterError::InvalidValue`] when a value has the wrong JSON type
    pub fn parse(schema: &FilterSchema, document: &str) -> Result<Self, FilterError> {
        let value: serde_json::Value = serde_json::from_str(document)
            .map_err(|err| FilterError::invalid_document(err.to_string()))?;
        Self::from_value(schema, &value)
    }

    /// Parse an already-deserialized filter document against `schema`.
    ///
    /// # Errors
    ///
    /// Same as [`FilterSet::parse`].
    pub fn from_value(
        schema: &FilterSchema,
        document: &serde_json::Value,
    ) -> Result<Self, FilterError> {
        let serde_json::Value::Object(entries) = document else {
            return Err(FilterError::invalid_document(format!(
                "expected a JSON object, got {}",
                json_type_name(document)
            )));
        };

        let mut clauses = Vec::new();
        for (name, value) in entries {
            if value.is_null() {
                continue;
            }
            let Some(field) = schema.field(name) else {
                return Err(FilterError::unknown_field(schema.name(), name));
            };
            let value = match field.kind {
                ColumnKind::Integer => value
                    .as_i64()
                    .map(FilterValue::Int)
                    .ok_or_else(|| invalid(name, field.kind, value))?,
                ColumnKind::Text => value
                    .as_str()
                    .map(|text| FilterValue::Text(text.to_string()))
                    .ok_or_else(|| invalid(name, field.kind, value))?,
            };
            clauses.push(FilterClause {
                column: field.column.clone(),
                op: field.op,
                value,
            });
        }

        Ok(Self { clauses })
    }

    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Lower the clauses into a conjunction of column comparisons.
    #[must_use]
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        for clause in &self.clauses {
            let column = Expr::col(Alias::new(clause.column.as_str()));
            let expr = match clause.op {
                FilterOp::Eq => column.eq(clause.value.to_value()),
                FilterOp::Lt => column.lt(clause.value.to_value()),
                FilterOp::Gt => column.gt(clause.value.to_value()),
                FilterOp::Like => match &clause.value {
                    FilterValue::Text(text) => column.like(format!("%{text}%")),
                    // parse never pairs Like with an integer
                    FilterValue::Int(value) => column.eq(*value),
                },
            };
            condition = condition.add(expr);
        }
        condition
    }
}

fn invalid(field: &str, expected: ColumnKind, value: &serde_json::Value) -> FilterError {
    FilterError::invalid_value(field, expected, json_type_name(value))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
