use crate::error::RegistryError;
use crate::models::match_record::{NewMatch, NewOutcome, NewSet, SetRow, SetScore, SetTally};
use crate::models::schema::{equipos_partidos, partidos, sets};
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};

pub trait MatchStore {
    /// Inserts the match, its sets and both outcome rows in one transaction.
    /// Sets are numbered from 1 in the order given.
    fn insert_match(&mut self, record: &NewMatch<'_>, scores: &[SetScore])
        -> Result<i32, RegistryError>;

    fn match_sets(&mut self, match_id: i32) -> Result<Vec<SetRow>, RegistryError>;
}

macro_rules! impl_match_store {
    ($conn:ty) => {
        impl MatchStore for $conn {
            fn insert_match(
                &mut self,
                record: &NewMatch<'_>,
                scores: &[SetScore],
            ) -> Result<i32, RegistryError> {
                let (team_1_result, team_2_result) = SetTally::from_sets(scores).outcome();

                self.transaction::<_, RegistryError, _>(|conn| {
                    let match_id = diesel::insert_into(partidos::table)
                        .values(record)
                        .returning(partidos::id)
                        .get_result::<i32>(conn)
                        .map_err(|err| RegistryError::write("match", err))?;

                    for (numero_set, score) in (1..).zip(scores) {
                        diesel::insert_into(sets::table)
                            .values(NewSet {
                                partido_id: match_id,
                                numero_set,
                                equipo_1_puntos: score.team_1_points,
                                equipo_2_puntos: score.team_2_points,
                            })
                            .execute(conn)
                            .map_err(|err| RegistryError::write("set", err))?;
                    }

                    let outcomes = [
                        NewOutcome {
                            partido_id: match_id,
                            equipo_id: record.equipo_1_id,
                            resultado: team_1_result.as_tag(),
                        },
                        NewOutcome {
                            partido_id: match_id,
                            equipo_id: record.equipo_2_id,
                            resultado: team_2_result.as_tag(),
                        },
                    ];
                    for outcome in &outcomes {
                        diesel::insert_into(equipos_partidos::table)
                            .values(outcome)
                            .execute(conn)
                            .map_err(|err| RegistryError::write("match outcome", err))?;
                    }
                    Ok(match_id)
                })
            }

            fn match_sets(&mut self, match_id: i32) -> Result<Vec<SetRow>, RegistryError> {
                let exists = diesel::select(diesel::dsl::exists(partidos::table.find(match_id)))
                    .get_result::<bool>(self)
                    .map_err(|err| RegistryError::read("match", err))?;
                if !exists {
                    return Err(RegistryError::NotFound {
                        entity: "match",
                        id: match_id.to_string(),
                    });
                }

                sets::table
                    .filter(sets::partido_id.eq(match_id))
                    .order(sets::numero_set)
                    .select(SetRow::as_select())
                    .load(self)
                    .map_err(|err| RegistryError::read("set", err))
            }
        }
    };
}

impl_match_store!(diesel::SqliteConnection);
#[cfg(feature = "postgres")]
impl_match_store!(diesel::PgConnection);
