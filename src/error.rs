use crate::config::config::ConfigError;
use crate::models::response::FailureResponse;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::error;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("bad configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("cannot reach the database: {0}")]
    Connectivity(#[from] diesel::r2d2::PoolError),
    #[error("{entity} already exists ({constraint})")]
    UniquenessViolation {
        entity: &'static str,
        constraint: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("failed to write {entity}: {source}")]
    WriteFailure {
        entity: &'static str,
        #[source]
        source: DieselError,
    },
    #[error("failed to read {entity}: {source}")]
    ReadFailure {
        entity: &'static str,
        #[source]
        source: DieselError,
    },
    #[error("inconsistent stored data: {0}")]
    Integrity(String),
    #[error("database error: {0}")]
    Database(#[from] DieselError),
}

impl RegistryError {
    /// Classifies a diesel error raised while writing `entity`.
    pub(crate) fn write(entity: &'static str, err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RegistryError::UniquenessViolation {
                    entity,
                    constraint: info
                        .constraint_name()
                        .map(str::to_owned)
                        .unwrap_or_else(|| info.message().to_owned()),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                RegistryError::InvalidInput(format!(
                    "{entity} references a row that does not exist ({})",
                    info.message()
                ))
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                RegistryError::InvalidInput(format!(
                    "{entity} violates a check constraint ({})",
                    info.message()
                ))
            }
            source => RegistryError::WriteFailure { entity, source },
        }
    }

    pub(crate) fn read(entity: &'static str, source: DieselError) -> Self {
        RegistryError::ReadFailure { entity, source }
    }

    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, RegistryError::UniquenessViolation { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RegistryError::InvalidInput(_))
    }
}

impl From<ValidationErrors> for RegistryError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let detail = err
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    if field == "__all__" {
                        detail
                    } else {
                        format!("{field}: {detail}")
                    }
                })
            })
            .collect();
        messages.sort();
        RegistryError::InvalidInput(messages.join("; "))
    }
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("background worker failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Registry(RegistryError::UniquenessViolation { .. }) => StatusCode::CONFLICT,
            ApiError::Registry(RegistryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::Connectivity(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed. The error: {:?}", self);
        }
        HttpResponse::build(status).json(FailureResponse::new(self.to_string()))
    }
}
