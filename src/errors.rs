//! # Error handling
//!
//! One error type covers the whole crate:
//! - Returns appropriate HTTP status codes when used as an Axum response
//! - Sends sanitized, user-friendly error messages
//! - Logs detailed internal errors for debugging
//!
//! **Never expose internal errors to users**. Database errors and processor
//! failures are logged server-side but never sent to clients.
//!
//! ```rust,ignore
//! use model_controller::ControllerError;
//!
//! async fn my_handler() -> Result<Json<Hero>, ControllerError> {
//!     let hero = hero::Entity::find_by_id(id)
//!         .one(db)
//!         .await
//!         .map_err(ControllerError::database)?
//!         .ok_or_else(|| ControllerError::not_found("hero", Some(id.to_string())))?;
//!
//!     Ok(Json(hero))
//! }
//! ```
//!
//! Internal errors are logged through the `tracing` crate; nothing is emitted
//! unless the application installs a subscriber.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filter::FilterError;
use crate::processor::ProcessorError;

/// Crate error type with automatic logging and sanitized responses.
#[derive(Debug)]
pub enum ControllerError {
    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// Resource type (e.g., "hero")
        resource: String,
        /// Optional ID that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - A create payload's discriminator matched no
    /// registered variant
    UnresolvedVariant {
        /// Base entity name the controller is bound to
        entity: &'static str,
        /// Discriminator value from the payload, if any was present
        discriminator: Option<String>,
    },

    /// 422 Unprocessable Entity - A filter document failed validation
    Filter(FilterError),

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database(DbErr),

    /// 500 Internal Server Error - A registered processor failed (details
    /// logged, not exposed)
    Processor {
        /// Name of the failing processor
        name: &'static str,
        /// Internal error (logged, not sent to user)
        source: ProcessorError,
    },
}

impl ControllerError {
    /// Create a 404 Not Found error
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 Bad Request error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a variant resolution error for a polymorphic create
    #[must_use]
    pub fn unresolved_variant(entity: &'static str, discriminator: Option<String>) -> Self {
        Self::UnresolvedVariant {
            entity,
            discriminator,
        }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database(err)
    }

    /// Create a 500 Internal Server Error from a failed processor
    #[must_use]
    pub fn processor(name: &'static str, source: ProcessorError) -> Self {
        Self::Processor { name, source }
    }

    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::UnresolvedVariant { .. } | Self::Filter(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Processor { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    format!("{resource} with ID '{id}' not found")
                } else {
                    format!("{resource} not found")
                }
            }
            Self::BadRequest { message } => message.clone(),
            Self::UnresolvedVariant {
                entity,
                discriminator,
            } => match discriminator {
                Some(value) => {
                    format!("No registered {entity} variant matches discriminator '{value}'")
                }
                None => format!("{entity} create payload is missing its discriminator"),
            },
            Self::Filter(err) => err.to_string(),
            Self::Database(_) => "A database error occurred".to_string(),
            Self::Processor { .. } => "A processor error occurred".to_string(),
        }
    }

    /// Log internal error details (not sent to user)
    ///
    /// Uses the `tracing` crate - only logs if the application has enabled
    /// tracing. No output otherwise.
    fn log_internal(&self) {
        match self {
            Self::Database(internal) => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Processor { name, source } => {
                tracing::error!(processor = name, error = %source, "Processor failed");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Controller error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
}

impl IntoResponse for ControllerError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(err) => Some(err),
            Self::Database(err) => Some(err),
            Self::Processor { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convert Sea-ORM `DbErr` to `ControllerError`
///
/// **Conversion rules:**
/// - `DbErr::RecordNotFound` → 404 Not Found
/// - All other `DbErr` variants → 500 Internal Server Error (logged
///   internally, sanitized for users)
impl From<DbErr> for ControllerError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::Database(err),
        }
    }
}

impl From<FilterError> for ControllerError {
    fn from(err: FilterError) -> Self {
        Self::Filter(err)
    }
}
