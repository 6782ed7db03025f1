use std::collections::HashMap;

use crate::error::RegistryError;
use crate::models::match_record::{MatchListing, MatchResult, MatchRow, OutcomeRow};
use crate::models::player::PlayerListing;
use crate::models::schema::{equipos, equipos_partidos, jugadores_equipos, partidos, usuarios};
use crate::models::team::{Team, TeamListing};
use diesel::{QueryDsl, RunQueryDsl, SelectableHelper};

/// Read-only rosters, in insertion order.
pub trait ReportStore {
    fn list_players(&mut self) -> Result<Vec<PlayerListing>, RegistryError>;

    fn list_teams(&mut self) -> Result<Vec<TeamListing>, RegistryError>;

    fn list_matches(&mut self) -> Result<Vec<MatchListing>, RegistryError>;
}

macro_rules! impl_report_store {
    ($conn:ty) => {
        impl ReportStore for $conn {
            fn list_players(&mut self) -> Result<Vec<PlayerListing>, RegistryError> {
                usuarios::table
                    .order(usuarios::id)
                    .select((usuarios::nombre, usuarios::nickname, usuarios::fecha_registro))
                    .load::<PlayerListing>(self)
                    .map_err(|err| RegistryError::read("player", err))
            }

            fn list_teams(&mut self) -> Result<Vec<TeamListing>, RegistryError> {
                let teams = equipos::table
                    .order(equipos::id)
                    .select(Team::as_select())
                    .load(self)
                    .map_err(|err| RegistryError::read("team", err))?;
                let members = jugadores_equipos::table
                    .inner_join(usuarios::table)
                    .order((jugadores_equipos::equipo_id, usuarios::id))
                    .select((jugadores_equipos::equipo_id, usuarios::nombre))
                    .load::<(i32, String)>(self)
                    .map_err(|err| RegistryError::read("team membership", err))?;
                Ok(team_listing(teams, members))
            }

            fn list_matches(&mut self) -> Result<Vec<MatchListing>, RegistryError> {
                let matches = partidos::table
                    .order(partidos::id)
                    .select(MatchRow::as_select())
                    .load(self)
                    .map_err(|err| RegistryError::read("match", err))?;
                let teams = equipos::table
                    .select(Team::as_select())
                    .load(self)
                    .map_err(|err| RegistryError::read("team", err))?;
                let outcomes = equipos_partidos::table
                    .select(OutcomeRow::as_select())
                    .load(self)
                    .map_err(|err| RegistryError::read("match outcome", err))?;
                match_listing(matches, teams, outcomes)
            }
        }
    };
}

impl_report_store!(diesel::SqliteConnection);
#[cfg(feature = "postgres")]
impl_report_store!(diesel::PgConnection);

/// Pairs each team with its member names. `members` must be sorted by
/// team and then player id; teams without exactly two members are skipped.
fn team_listing(teams: Vec<Team>, members: Vec<(i32, String)>) -> Vec<TeamListing> {
    let mut by_team: HashMap<i32, Vec<String>> = HashMap::new();
    for (team_id, name) in members {
        by_team.entry(team_id).or_default().push(name);
    }

    teams
        .into_iter()
        .filter_map(|team| {
            let names = by_team.remove(&team.id)?;
            let [player_1_name, player_2_name]: [String; 2] = names.try_into().ok()?;
            Some(TeamListing {
                team_id: team.id,
                team_name: team.name,
                player_1_name,
                player_2_name,
            })
        })
        .collect()
}

fn match_listing(
    matches: Vec<MatchRow>,
    teams: Vec<Team>,
    outcomes: Vec<OutcomeRow>,
) -> Result<Vec<MatchListing>, RegistryError> {
    let names: HashMap<i32, String> = teams.into_iter().map(|t| (t.id, t.name)).collect();
    let mut results: HashMap<(i32, i32), MatchResult> = HashMap::new();
    for outcome in outcomes {
        let result = MatchResult::from_tag(&outcome.result).ok_or_else(|| {
            RegistryError::Integrity(format!(
                "match {} has unknown result {:?} for team {}",
                outcome.match_id, outcome.result, outcome.team_id
            ))
        })?;
        results.insert((outcome.match_id, outcome.team_id), result);
    }

    Ok(matches
        .into_iter()
        .filter_map(|row| {
            let team_1_name = names.get(&row.team_1_id)?.clone();
            let team_2_name = names.get(&row.team_2_id)?.clone();
            Some(MatchListing {
                id: row.id,
                date: row.date,
                venue: row.venue,
                team_1_name,
                team_2_name,
                team_1_result: results.get(&(row.id, row.team_1_id)).copied(),
                team_2_result: results.get(&(row.id, row.team_2_id)).copied(),
            })
        })
        .collect())
}
