use std::io;

use actix_web::{web, App, HttpServer};
use log::{error, info};
use padel_registry::config::config::Config;
use padel_registry::controller;
use padel_registry::controller::handler::{health_check, not_found};
use padel_registry::repository::database::Database;
use padel_registry::AppState;

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    error!("Startup failed: {}", err);
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    log4rs::init_file("./log-config.yml", Default::default())
        .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err.to_string()))?;

    let config = Config::init().map_err(startup_error)?;
    let db = Database::connect(&config.database).map_err(startup_error)?;
    if config.init_schema {
        db.ensure_schema().map_err(startup_error)?;
    }
    let app_data = web::Data::new(AppState { db });

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(controller::handler::config)
            .service(health_check)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
