pub mod admin;
pub mod database;
pub mod ddl;
pub mod matches;
pub mod players;
pub mod reports;
pub mod teams;

pub use admin::AdminStore;
pub use database::Database;
pub use ddl::{Dialect, SchemaStore};
pub use matches::MatchStore;
pub use players::PlayerStore;
pub use reports::ReportStore;
pub use teams::TeamStore;

/// Everything a storage adapter has to provide.
pub trait Store: SchemaStore + PlayerStore + TeamStore + MatchStore + ReportStore + AdminStore {}

impl<T> Store for T where
    T: SchemaStore + PlayerStore + TeamStore + MatchStore + ReportStore + AdminStore
{
}

#[cfg(test)]
pub(crate) fn memory_connection() -> diesel::SqliteConnection {
    use diesel::connection::SimpleConnection;
    use diesel::Connection;

    let mut conn = diesel::SqliteConnection::establish(":memory:").unwrap();
    conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
    conn.ensure_schema().unwrap();
    conn
}
