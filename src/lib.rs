pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

use crate::repository::database::Database;

pub struct AppState {
    pub db: Database,
}
