use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use padel_registry::config::config::DatabaseConfig;
use padel_registry::controller;
use padel_registry::controller::handler::{health_check, not_found};
use padel_registry::repository::database::Database;
use padel_registry::AppState;
use serde_json::{json, Value};

fn state() -> web::Data<AppState> {
    let db = Database::connect(&DatabaseConfig::from_url(":memory:").unwrap()).unwrap();
    db.ensure_schema().unwrap();
    web::Data::new(AppState { db })
}

async fn body(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(state())
                .configure(controller::handler::config)
                .service(health_check)
                .default_service(web::route().to(not_found)),
        )
        .await
    };
}

#[actix_web::test]
async fn player_registration_and_duplicates() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({"name": "Ana Torres", "nickname": "anita"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body(resp).await;
    assert_eq!(created["status"], "success");
    assert!(created["data"]["id"].is_i64());

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({"name": "Ana Ruiz", "nickname": "anita"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body(resp).await["status"], "failed");

    let req = test::TestRequest::get().uri("/api/players/anita").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["data"]["name"], "Ana Torres");

    let req = test::TestRequest::get().uri("/api/players/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/players").to_request();
    let players = body(test::call_service(&app, req).await).await;
    assert_eq!(players["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/players")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["status"], "failed");
}

#[actix_web::test]
async fn teams_and_matches_round_trip() {
    let app = app!();

    let mut ids = Vec::new();
    for (name, nickname) in [("Ana", "ana"), ("Bea", "bea"), ("Cris", "cris"), ("Dani", "dani")] {
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(json!({"name": name, "nickname": nickname}))
            .to_request();
        let created = body(test::call_service(&app, req).await).await;
        ids.push(created["data"]["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::post()
        .uri("/api/teams")
        .set_json(json!({"name": "Solo", "player_1_id": ids[0], "player_2_id": ids[0]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut teams = Vec::new();
    for (name, a, b) in [("Norte", ids[1], ids[0]), ("Sur", ids[2], ids[3])] {
        let req = test::TestRequest::post()
            .uri("/api/teams")
            .set_json(json!({"name": name, "player_1_id": a, "player_2_id": b}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        teams.push(body(resp).await["data"]["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get().uri("/api/teams").to_request();
    let listing = body(test::call_service(&app, req).await).await;
    assert_eq!(
        listing["data"][0],
        json!({"teamId": teams[0], "teamName": "Norte", "player1": "Ana", "player2": "Bea"})
    );
    assert_eq!(listing["data"][1]["player1"], "Cris");

    let req = test::TestRequest::put()
        .uri(&format!("/api/teams/{}/players/{}/payment", teams[0], ids[0]))
        .set_json(json!({"paid": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({
            "date": "2024-05-01",
            "venue": "Club de Campo",
            "team_1_id": teams[0],
            "team_2_id": teams[1],
            "sets": [
                {"team_1_points": 6, "team_2_points": 4},
                {"team_1_points": 4, "team_2_points": 6}
            ],
            "court": "Pista 3",
            "cost": 32
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let match_id = body(resp).await["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let matches = body(test::call_service(&app, req).await).await;
    let listed = &matches["data"][0];
    assert_eq!(listed["id"], match_id);
    assert_eq!(listed["team1"], "Norte");
    assert_eq!(listed["team2"], "Sur");
    assert_eq!(listed["team1Result"], "Empate");
    assert_eq!(listed["team2Result"], "Empate");

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/{match_id}/sets"))
        .to_request();
    let sets = body(test::call_service(&app, req).await).await;
    assert_eq!(sets["data"].as_array().unwrap().len(), 2);
    assert_eq!(sets["data"][1]["setNumber"], 2);

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({
            "date": "2024-05-02",
            "venue": "Club de Campo",
            "team_1_id": teams[0],
            "team_2_id": teams[1],
            "sets": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/matches/999/sets").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unparsable_path_ids_are_bad_requests() {
    let app = app!();

    for req in [
        test::TestRequest::get().uri("/api/matches/abc/sets"),
        test::TestRequest::get().uri("/api/matches/99999999999/sets"),
        test::TestRequest::put()
            .uri("/api/teams/x/players/1/payment")
            .set_json(json!({"paid": true})),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["status"], "failed");
    }
}

#[actix_web::test]
async fn unknown_routes_get_a_failure_body() {
    let app = app!();

    for uri in ["/nope", "/api/nope"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let failure = body(resp).await;
        assert_eq!(failure["status"], "failed");
        assert_eq!(failure["message"], "Resource not found");
    }

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["status"], "success");
}
