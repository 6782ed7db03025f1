use std::time::Duration;

use crate::config::config::{Backend, DatabaseConfig};
use crate::error::RegistryError;
use crate::models::admin::{PurgeSummary, Table};
use crate::models::match_record::{MatchListing, NewMatch, RecordMatchRequest, SetRow};
use crate::models::player::{NewPlayer, Player, PlayerListing, RegisterPlayerRequest};
use crate::models::team::{CreateTeamRequest, TeamListing};
use crate::repository::Store;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use log::{error, info, warn};
use serde_json::Value;
use validator::Validate;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
#[cfg(feature = "postgres")]
pub type PgPool = Pool<ConnectionManager<diesel::PgConnection>>;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
enum DbPool {
    Sqlite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

/// Pooled handle to the registry database. Each operation checks out one
/// connection and returns it when done.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

#[derive(Debug)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

impl Database {
    pub fn connect(config: &DatabaseConfig) -> Result<Self, RegistryError> {
        let pool = match config.backend {
            Backend::Sqlite => {
                let manager = ConnectionManager::<SqliteConnection>::new(config.url.as_str());
                let mut builder = SqlitePool::builder()
                    .max_size(config.pool_size)
                    .connection_timeout(config.connect_timeout)
                    .connection_customizer(Box::new(SqlitePragmas {
                        busy_timeout: SQLITE_BUSY_TIMEOUT,
                    }));
                if config.is_in_memory() {
                    // Every in-memory connection is its own database, so keep exactly one alive.
                    builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
                }
                DbPool::Sqlite(builder.build(manager)?)
            }
            #[cfg(feature = "postgres")]
            Backend::Postgres => {
                let manager = ConnectionManager::<diesel::PgConnection>::new(config.url.as_str());
                let pool = PgPool::builder()
                    .max_size(config.pool_size)
                    .connection_timeout(config.connect_timeout)
                    .build(manager)?;
                DbPool::Postgres(pool)
            }
            #[cfg(not(feature = "postgres"))]
            Backend::Postgres => {
                let err =
                    crate::config::config::ConfigError::UnsupportedBackend("postgres".to_owned());
                return Err(err.into());
            }
        };
        info!(
            "Connected to {:?} database at {}",
            config.backend,
            config.redacted_url()
        );
        Ok(Database { pool })
    }

    pub fn backend(&self) -> Backend {
        match self.pool {
            DbPool::Sqlite(_) => Backend::Sqlite,
            #[cfg(feature = "postgres")]
            DbPool::Postgres(_) => Backend::Postgres,
        }
    }

    fn run<T, F>(&self, operation: &str, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut dyn Store) -> Result<T, RegistryError>,
    {
        let result = match &self.pool {
            DbPool::Sqlite(pool) => pool
                .get()
                .map_err(RegistryError::from)
                .and_then(|mut conn| f(&mut *conn)),
            #[cfg(feature = "postgres")]
            DbPool::Postgres(pool) => pool
                .get()
                .map_err(RegistryError::from)
                .and_then(|mut conn| f(&mut *conn)),
        };
        if let Err(err) = &result {
            log_failure(operation, err);
        }
        result
    }

    pub fn ensure_schema(&self) -> Result<(), RegistryError> {
        self.run("ensure_schema", |store| store.ensure_schema())?;
        info!("Schema is up to date");
        Ok(())
    }

    pub fn register_player(&self, req: &RegisterPlayerRequest) -> Result<i32, RegistryError> {
        let player = NewPlayer {
            name: req.name.trim(),
            nickname: req.nickname.trim(),
        };
        validate("register_player", req)?;
        let id = self.run("register_player", |store| store.insert_player(&player))?;
        info!("Registered player {:?} with id {}", player.nickname, id);
        Ok(id)
    }

    pub fn find_player_by_nickname(&self, nickname: &str) -> Result<Option<Player>, RegistryError> {
        self.run("find_player_by_nickname", |store| {
            store.find_player_by_nickname(nickname.trim())
        })
    }

    pub fn list_players(&self) -> Result<Vec<PlayerListing>, RegistryError> {
        self.run("list_players", |store| store.list_players())
    }

    pub fn create_team(&self, req: &CreateTeamRequest) -> Result<i32, RegistryError> {
        validate("create_team", req)?;
        let id = self.run("create_team", |store| {
            store.insert_team(req.name.trim(), req.player_1_id, req.player_2_id)
        })?;
        info!(
            "Created team {:?} with id {} (players {} and {})",
            req.name.trim(),
            id,
            req.player_1_id,
            req.player_2_id
        );
        Ok(id)
    }

    pub fn set_payment_status(
        &self,
        team_id: i32,
        player_id: i32,
        paid: bool,
    ) -> Result<(), RegistryError> {
        self.run("set_payment_status", |store| {
            store.set_payment_status(team_id, player_id, paid)
        })
    }

    pub fn list_teams(&self) -> Result<Vec<TeamListing>, RegistryError> {
        self.run("list_teams", |store| store.list_teams())
    }

    pub fn record_match(&self, req: &RecordMatchRequest) -> Result<i32, RegistryError> {
        validate("record_match", req)?;
        let id = self.run("record_match", |store| {
            store.insert_match(&NewMatch::from(req), &req.sets)
        })?;
        info!(
            "Recorded match {} between teams {} and {} ({} sets)",
            id,
            req.team_1_id,
            req.team_2_id,
            req.sets.len()
        );
        Ok(id)
    }

    pub fn match_sets(&self, match_id: i32) -> Result<Vec<SetRow>, RegistryError> {
        self.run("match_sets", |store| store.match_sets(match_id))
    }

    pub fn list_matches(&self) -> Result<Vec<MatchListing>, RegistryError> {
        self.run("list_matches", |store| store.list_matches())
    }

    pub fn delete_match(&self, match_id: i32) -> Result<bool, RegistryError> {
        let deleted = self.run("delete_match", |store| store.delete_match(match_id))?;
        if deleted {
            info!("Deleted match {} with its sets and outcomes", match_id);
        }
        Ok(deleted)
    }

    pub fn purge_matches(&self) -> Result<PurgeSummary, RegistryError> {
        let summary = self.run("purge_matches", |store| store.purge_matches())?;
        info!("Purged match data: {:?}", summary);
        Ok(summary)
    }

    pub fn dump_table(&self, table: Table) -> Result<Vec<Value>, RegistryError> {
        self.run("dump_table", |store| store.dump_table(table))
    }
}

/// Rejects malformed input before a connection is checked out.
fn validate(operation: &str, req: &impl Validate) -> Result<(), RegistryError> {
    req.validate().map_err(|errors| {
        let err = RegistryError::from(errors);
        log_failure(operation, &err);
        err
    })
}

fn log_failure(operation: &str, err: &RegistryError) {
    match err {
        RegistryError::InvalidInput(_)
        | RegistryError::UniquenessViolation { .. }
        | RegistryError::NotFound { .. } => warn!("{} rejected: {}", operation, err),
        _ => error!(
            "An error occurred in the {} operation. The error: {:?}",
            operation, err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::ConfigError;
    use crate::models::match_record::{MatchResult, SetScore};
    use chrono::NaiveDate;

    fn database() -> Database {
        let db = Database::connect(&DatabaseConfig::from_url(":memory:").unwrap()).unwrap();
        db.ensure_schema().unwrap();
        db
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn postgres_without_the_feature_is_a_configuration_error() {
        let config = DatabaseConfig {
            url: "postgres://padel@db/padel".to_owned(),
            backend: Backend::Postgres,
            pool_size: 1,
            connect_timeout: Duration::from_secs(1),
        };
        let err = Database::connect(&config).err().unwrap();
        assert!(
            matches!(err, RegistryError::Configuration(ConfigError::UnsupportedBackend(_))),
            "{err:?}"
        );
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn blank_names_are_rejected_before_writing() {
        let db = database();
        let err = db
            .register_player(&RegisterPlayerRequest::new("  ", "anita"))
            .unwrap_err();
        assert!(err.is_invalid_input(), "{err:?}");
        assert!(db.list_players().unwrap().is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let db = database();
        db.register_player(&RegisterPlayerRequest::new(" Ana ", " anita "))
            .unwrap();
        let player = db.find_player_by_nickname("anita").unwrap().unwrap();
        assert_eq!(player.name, "Ana");
    }

    #[test]
    fn same_player_twice_creates_nothing() {
        let db = database();
        let ana = db
            .register_player(&RegisterPlayerRequest::new("Ana", "ana"))
            .unwrap();

        let err = db
            .create_team(&CreateTeamRequest {
                name: "Solitaria".to_owned(),
                player_1_id: ana,
                player_2_id: ana,
            })
            .unwrap_err();
        assert!(err.is_invalid_input(), "{err:?}");
        assert!(db.list_teams().unwrap().is_empty());
        assert!(db.dump_table(Table::Equipos).unwrap().is_empty());
        assert!(db.dump_table(Table::JugadoresEquipos).unwrap().is_empty());
    }

    #[test]
    fn full_cycle_through_the_pool() {
        let db = database();
        let mut players = Vec::new();
        for (name, nickname) in [("Ana", "ana"), ("Bea", "bea"), ("Cris", "cris"), ("Dani", "dani")] {
            players.push(
                db.register_player(&RegisterPlayerRequest::new(name, nickname))
                    .unwrap(),
            );
        }
        let north = db
            .create_team(&CreateTeamRequest {
                name: "Norte".to_owned(),
                player_1_id: players[1],
                player_2_id: players[0],
            })
            .unwrap();
        let south = db
            .create_team(&CreateTeamRequest {
                name: "Sur".to_owned(),
                player_1_id: players[2],
                player_2_id: players[3],
            })
            .unwrap();

        let same_team = RecordMatchRequest::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "Club",
            north,
            north,
            vec![SetScore::new(6, 4)],
        );
        assert!(db.record_match(&same_team).unwrap_err().is_invalid_input());
        assert!(db.list_matches().unwrap().is_empty());

        let id = db
            .record_match(&RecordMatchRequest::new(
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                "Club",
                north,
                south,
                vec![SetScore::new(6, 4), SetScore::new(3, 6), SetScore::new(6, 2)],
            ))
            .unwrap();

        let matches = db.list_matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, id);
        assert_eq!(matches[0].team_1_result, Some(MatchResult::Winner));
        assert_eq!(matches[0].team_2_result, Some(MatchResult::Loser));
        assert_eq!(db.match_sets(id).unwrap().len(), 3);

        let teams = db.list_teams().unwrap();
        assert_eq!(teams[0].player_1_name, "Ana");
        assert_eq!(teams[0].player_2_name, "Bea");

        assert!(db.delete_match(id).unwrap());
        assert!(db.list_matches().unwrap().is_empty());
    }
}
