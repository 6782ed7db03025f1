use crate::models::match_record::RecordMatchRequest;
use crate::models::player::RegisterPlayerRequest;
use crate::models::response::{ApiResponse, FailureResponse};
use crate::models::team::{CreateTeamRequest, PaymentStatusRequest};
use crate::service::matches::{list_matches_service, match_sets_service, record_match_service};
use crate::service::player::{find_player_service, list_players_service, register_player_service};
use crate::service::team::{create_team_service, list_teams_service, set_payment_status_service};
use crate::AppState;
use actix_web::error::InternalError;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(json!({
        "message": "Everything is working as expected"
    })))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(FailureResponse::new("Resource not found"))
}

#[post("/players")]
async fn register_player_handler(
    data: Data<AppState>,
    new_player: Json<RegisterPlayerRequest>,
) -> impl Responder {
    register_player_service(data, new_player).await
}

#[get("/players")]
async fn list_players_handler(data: Data<AppState>) -> impl Responder {
    list_players_service(data).await
}

#[get("/players/{nickname}")]
async fn find_player_handler(data: Data<AppState>, nickname: Path<String>) -> impl Responder {
    find_player_service(data, nickname.into_inner()).await
}

#[post("/teams")]
async fn create_team_handler(
    data: Data<AppState>,
    new_team: Json<CreateTeamRequest>,
) -> impl Responder {
    create_team_service(data, new_team).await
}

#[get("/teams")]
async fn list_teams_handler(data: Data<AppState>) -> impl Responder {
    list_teams_service(data).await
}

#[put("/teams/{team_id}/players/{player_id}/payment")]
async fn set_payment_status_handler(
    data: Data<AppState>,
    path: Path<(i32, i32)>,
    status: Json<PaymentStatusRequest>,
) -> impl Responder {
    let (team_id, player_id) = path.into_inner();
    set_payment_status_service(data, team_id, player_id, status).await
}

#[post("/matches")]
async fn record_match_handler(
    data: Data<AppState>,
    new_match: Json<RecordMatchRequest>,
) -> impl Responder {
    record_match_service(data, new_match).await
}

#[get("/matches")]
async fn list_matches_handler(data: Data<AppState>) -> impl Responder {
    list_matches_service(data).await
}

#[get("/matches/{match_id}/sets")]
async fn match_sets_handler(data: Data<AppState>, match_id: Path<i32>) -> impl Responder {
    match_sets_service(data, match_id.into_inner()).await
}

pub fn config(conf: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let body = FailureResponse::new(err.to_string());
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    // Unparsable path segments answer 400 with a failure body.
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        let body = FailureResponse::new(err.to_string());
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    let scope = web::scope("/api")
        .app_data(json_config)
        .app_data(path_config)
        .service(register_player_handler)
        .service(list_players_handler)
        .service(find_player_handler)
        .service(create_team_handler)
        .service(list_teams_handler)
        .service(set_payment_status_handler)
        .service(record_match_handler)
        .service(list_matches_handler)
        .service(match_sets_handler);

    conf.service(scope);
}
