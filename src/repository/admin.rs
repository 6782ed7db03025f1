use crate::error::RegistryError;
use crate::models::admin::{PurgeSummary, Table};
use crate::models::match_record::{MatchRow, OutcomeRow, SetRow};
use crate::models::player::Player;
use crate::models::schema::{equipos, equipos_partidos, jugadores_equipos, partidos, sets, usuarios};
use crate::models::team::{Membership, Team};
use diesel::result::QueryResult;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use serde::Serialize;
use serde_json::Value;

/// Maintenance operations. Deletes cascade to a match's sets and outcomes.
pub trait AdminStore {
    /// Returns whether the match existed.
    fn delete_match(&mut self, match_id: i32) -> Result<bool, RegistryError>;

    fn purge_matches(&mut self) -> Result<PurgeSummary, RegistryError>;

    fn dump_table(&mut self, table: Table) -> Result<Vec<Value>, RegistryError>;
}

macro_rules! impl_admin_store {
    ($conn:ty) => {
        impl AdminStore for $conn {
            fn delete_match(&mut self, match_id: i32) -> Result<bool, RegistryError> {
                self.transaction::<_, RegistryError, _>(|conn| {
                    diesel::delete(
                        equipos_partidos::table.filter(equipos_partidos::partido_id.eq(match_id)),
                    )
                    .execute(conn)
                    .map_err(|err| RegistryError::write("match outcome", err))?;
                    diesel::delete(sets::table.filter(sets::partido_id.eq(match_id)))
                        .execute(conn)
                        .map_err(|err| RegistryError::write("set", err))?;
                    let deleted = diesel::delete(partidos::table.find(match_id))
                        .execute(conn)
                        .map_err(|err| RegistryError::write("match", err))?;
                    Ok(deleted > 0)
                })
            }

            fn purge_matches(&mut self) -> Result<PurgeSummary, RegistryError> {
                self.transaction::<_, RegistryError, _>(|conn| {
                    let outcomes = diesel::delete(equipos_partidos::table)
                        .execute(conn)
                        .map_err(|err| RegistryError::write("match outcome", err))?;
                    let set_rows = diesel::delete(sets::table)
                        .execute(conn)
                        .map_err(|err| RegistryError::write("set", err))?;
                    let matches = diesel::delete(partidos::table)
                        .execute(conn)
                        .map_err(|err| RegistryError::write("match", err))?;
                    Ok(PurgeSummary {
                        matches,
                        sets: set_rows,
                        outcomes,
                    })
                })
            }

            fn dump_table(&mut self, table: Table) -> Result<Vec<Value>, RegistryError> {
                match table {
                    Table::Usuarios => rows_to_json(
                        table,
                        usuarios::table
                            .order(usuarios::id)
                            .select(Player::as_select())
                            .load(self),
                    ),
                    Table::Equipos => rows_to_json(
                        table,
                        equipos::table
                            .order(equipos::id)
                            .select(Team::as_select())
                            .load(self),
                    ),
                    Table::JugadoresEquipos => rows_to_json(
                        table,
                        jugadores_equipos::table
                            .order((jugadores_equipos::equipo_id, jugadores_equipos::usuario_id))
                            .select(Membership::as_select())
                            .load(self),
                    ),
                    Table::Partidos => rows_to_json(
                        table,
                        partidos::table
                            .order(partidos::id)
                            .select(MatchRow::as_select())
                            .load(self),
                    ),
                    Table::Sets => rows_to_json(
                        table,
                        sets::table
                            .order(sets::id)
                            .select(SetRow::as_select())
                            .load(self),
                    ),
                    Table::EquiposPartidos => rows_to_json(
                        table,
                        equipos_partidos::table
                            .order((equipos_partidos::partido_id, equipos_partidos::equipo_id))
                            .select(OutcomeRow::as_select())
                            .load(self),
                    ),
                }
            }
        }
    };
}

impl_admin_store!(diesel::SqliteConnection);
#[cfg(feature = "postgres")]
impl_admin_store!(diesel::PgConnection);

fn rows_to_json<T: Serialize>(
    table: Table,
    rows: QueryResult<Vec<T>>,
) -> Result<Vec<Value>, RegistryError> {
    rows.map_err(|err| RegistryError::read(table.name(), err))?
        .iter()
        .map(|row| {
            serde_json::to_value(row).map_err(|err| {
                RegistryError::Integrity(format!("cannot serialize a {table} row: {err}"))
            })
        })
        .collect()
}
