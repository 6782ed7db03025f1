use crate::error::RegistryError;
use crate::models::schema::{equipos, jugadores_equipos};
use crate::models::team::{NewMembership, NewTeam};
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};

pub trait TeamStore {
    /// Inserts the team and both memberships atomically.
    fn insert_team(
        &mut self,
        name: &str,
        player_1_id: i32,
        player_2_id: i32,
    ) -> Result<i32, RegistryError>;

    fn set_payment_status(
        &mut self,
        team_id: i32,
        player_id: i32,
        paid: bool,
    ) -> Result<(), RegistryError>;
}

macro_rules! impl_team_store {
    ($conn:ty) => {
        impl TeamStore for $conn {
            fn insert_team(
                &mut self,
                name: &str,
                player_1_id: i32,
                player_2_id: i32,
            ) -> Result<i32, RegistryError> {
                self.transaction::<_, RegistryError, _>(|conn| {
                    let team_id = diesel::insert_into(equipos::table)
                        .values(NewTeam { name })
                        .returning(equipos::id)
                        .get_result::<i32>(conn)
                        .map_err(|err| RegistryError::write("team", err))?;

                    for player_id in [player_1_id, player_2_id] {
                        diesel::insert_into(jugadores_equipos::table)
                            .values(NewMembership { team_id, player_id })
                            .execute(conn)
                            .map_err(|err| RegistryError::write("team membership", err))?;
                    }
                    Ok(team_id)
                })
            }

            fn set_payment_status(
                &mut self,
                team_id: i32,
                player_id: i32,
                paid: bool,
            ) -> Result<(), RegistryError> {
                let updated =
                    diesel::update(jugadores_equipos::table.find((team_id, player_id)))
                        .set(jugadores_equipos::estado_de_pago.eq(Some(paid)))
                        .execute(self)
                        .map_err(|err| RegistryError::write("team membership", err))?;
                if updated == 0 {
                    return Err(RegistryError::NotFound {
                        entity: "team membership",
                        id: format!("{team_id}/{player_id}"),
                    });
                }
                Ok(())
            }
        }
    };
}

impl_team_store!(diesel::SqliteConnection);
#[cfg(feature = "postgres")]
impl_team_store!(diesel::PgConnection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::NewPlayer;
    use crate::models::team::{Membership, Team};
    use crate::repository::{memory_connection, PlayerStore};
    use diesel::SelectableHelper;

    fn player(conn: &mut diesel::SqliteConnection, nickname: &str) -> i32 {
        conn.insert_player(&NewPlayer {
            name: nickname,
            nickname,
        })
        .unwrap()
    }

    #[test]
    fn team_gets_two_memberships() {
        let mut conn = memory_connection();
        let ana = player(&mut conn, "ana");
        let bea = player(&mut conn, "bea");

        let team = conn.insert_team("Las Rápidas", bea, ana).unwrap();

        let members = jugadores_equipos::table
            .filter(jugadores_equipos::equipo_id.eq(team))
            .select(Membership::as_select())
            .order(jugadores_equipos::usuario_id)
            .load(&mut conn)
            .unwrap();
        let ids: Vec<i32> = members.iter().map(|m| m.player_id).collect();
        assert_eq!(ids, vec![ana, bea]);
        assert!(members.iter().all(|m| m.paid.is_none()));
    }

    #[test]
    fn unknown_player_rolls_the_team_back() {
        let mut conn = memory_connection();
        let ana = player(&mut conn, "ana");

        let err = conn.insert_team("Fantasmas", ana, 999).unwrap_err();
        assert!(err.is_invalid_input(), "{err:?}");

        let teams = equipos::table
            .select(Team::as_select())
            .load(&mut conn)
            .unwrap();
        assert!(teams.is_empty());
        let memberships: i64 = jugadores_equipos::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(memberships, 0);
    }

    #[test]
    fn duplicate_team_name_is_rejected() {
        let mut conn = memory_connection();
        let ana = player(&mut conn, "ana");
        let bea = player(&mut conn, "bea");
        let cris = player(&mut conn, "cris");
        let dani = player(&mut conn, "dani");

        conn.insert_team("Las Rápidas", ana, bea).unwrap();
        let err = conn.insert_team("Las Rápidas", cris, dani).unwrap_err();
        assert!(err.is_uniqueness_violation(), "{err:?}");
    }

    #[test]
    fn payment_status_is_recorded() {
        let mut conn = memory_connection();
        let ana = player(&mut conn, "ana");
        let bea = player(&mut conn, "bea");
        let team = conn.insert_team("Las Rápidas", ana, bea).unwrap();

        conn.set_payment_status(team, ana, true).unwrap();
        let paid: Option<bool> = jugadores_equipos::table
            .find((team, ana))
            .select(jugadores_equipos::estado_de_pago)
            .first(&mut conn)
            .unwrap();
        assert_eq!(paid, Some(true));

        let err = conn.set_payment_status(team, 999, true).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }
}
