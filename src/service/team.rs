use crate::error::ApiError;
use crate::models::response::{ApiResponse, CreatedId};
use crate::models::team::{CreateTeamRequest, PaymentStatusRequest};
use crate::service::run_blocking;
use crate::AppState;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use serde_json::json;

pub async fn create_team_service(
    data: Data<AppState>,
    new_team: Json<CreateTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = new_team.into_inner();
    let id = run_blocking(&data, move |db| db.create_team(&request)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedId { id })))
}

pub async fn list_teams_service(data: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let teams = run_blocking(&data, |db| db.list_teams()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(teams)))
}

pub async fn set_payment_status_service(
    data: Data<AppState>,
    team_id: i32,
    player_id: i32,
    status: Json<PaymentStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let paid = status.paid;
    run_blocking(&data, move |db| db.set_payment_status(team_id, player_id, paid)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({
        "teamId": team_id,
        "playerId": player_id,
        "paid": paid,
    }))))
}
