use crate::error::{ApiError, RegistryError};
use crate::models::player::RegisterPlayerRequest;
use crate::models::response::{ApiResponse, CreatedId};
use crate::service::run_blocking;
use crate::AppState;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;

pub async fn register_player_service(
    data: Data<AppState>,
    new_player: Json<RegisterPlayerRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = new_player.into_inner();
    let id = run_blocking(&data, move |db| db.register_player(&request)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedId { id })))
}

pub async fn list_players_service(data: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let players = run_blocking(&data, |db| db.list_players()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(players)))
}

pub async fn find_player_service(
    data: Data<AppState>,
    nickname: String,
) -> Result<HttpResponse, ApiError> {
    let lookup = nickname.clone();
    match run_blocking(&data, move |db| db.find_player_by_nickname(&lookup)).await? {
        Some(player) => Ok(HttpResponse::Ok().json(ApiResponse::success(player))),
        None => Err(RegistryError::NotFound {
            entity: "player",
            id: nickname,
        }
        .into()),
    }
}
