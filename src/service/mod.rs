use crate::error::{ApiError, RegistryError};
use crate::repository::database::Database;
use crate::AppState;
use actix_web::web::{self, Data};

pub mod matches;
pub mod player;
pub mod team;

/// Runs a blocking database operation on actix's blocking thread pool.
pub(crate) async fn run_blocking<T, F>(data: &Data<AppState>, operation: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    let db = data.db.clone();
    let result = web::block(move || operation(&db)).await?;
    Ok(result?)
}
