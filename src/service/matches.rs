use crate::error::ApiError;
use crate::models::match_record::RecordMatchRequest;
use crate::models::response::{ApiResponse, CreatedId};
use crate::service::run_blocking;
use crate::AppState;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;

pub async fn record_match_service(
    data: Data<AppState>,
    new_match: Json<RecordMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = new_match.into_inner();
    let id = run_blocking(&data, move |db| db.record_match(&request)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedId { id })))
}

pub async fn list_matches_service(data: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let matches = run_blocking(&data, |db| db.list_matches()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(matches)))
}

pub async fn match_sets_service(
    data: Data<AppState>,
    match_id: i32,
) -> Result<HttpResponse, ApiError> {
    let sets = run_blocking(&data, move |db| db.match_sets(match_id)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(sets)))
}
