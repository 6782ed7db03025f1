use std::borrow::Cow;
use std::cmp::Ordering;

use crate::models::schema::{equipos_partidos, partidos, sets};
use chrono::NaiveDate;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MAX_SETS: usize = 3;

/// Result tag stored per team in `equipos_partidos.resultado`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "Ganador")]
    Winner,
    #[serde(rename = "Perdedor")]
    Loser,
    #[serde(rename = "Empate")]
    Draw,
}

impl MatchResult {
    pub fn as_tag(self) -> &'static str {
        match self {
            MatchResult::Winner => "Ganador",
            MatchResult::Loser => "Perdedor",
            MatchResult::Draw => "Empate",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Ganador" => Some(MatchResult::Winner),
            "Perdedor" => Some(MatchResult::Loser),
            "Empate" => Some(MatchResult::Draw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub team_1_points: i32,
    pub team_2_points: i32,
}

impl SetScore {
    pub fn new(team_1_points: i32, team_2_points: i32) -> Self {
        SetScore {
            team_1_points,
            team_2_points,
        }
    }
}

/// Sets won by each side. A tied set counts for neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetTally {
    pub team_1: usize,
    pub team_2: usize,
}

impl SetTally {
    pub fn from_sets(sets: &[SetScore]) -> Self {
        sets.iter().fold(SetTally::default(), |mut tally, set| {
            match set.team_1_points.cmp(&set.team_2_points) {
                Ordering::Greater => tally.team_1 += 1,
                Ordering::Less => tally.team_2 += 1,
                Ordering::Equal => {}
            }
            tally
        })
    }

    /// Results for (team 1, team 2).
    pub fn outcome(self) -> (MatchResult, MatchResult) {
        match self.team_1.cmp(&self.team_2) {
            Ordering::Greater => (MatchResult::Winner, MatchResult::Loser),
            Ordering::Less => (MatchResult::Loser, MatchResult::Winner),
            Ordering::Equal => (MatchResult::Draw, MatchResult::Draw),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "distinct_teams"))]
pub struct RecordMatchRequest {
    pub date: NaiveDate,
    pub venue: String,
    pub team_1_id: i32,
    pub team_2_id: i32,
    #[validate(
        length(min = 1, max = 3, message = "a match has between one and three sets"),
        custom = "non_negative_points"
    )]
    pub sets: Vec<SetScore>,
    pub court: Option<String>,
    #[validate(range(min = 0, message = "cost must not be negative"))]
    pub cost: Option<i32>,
    pub discounted: Option<bool>,
    pub created_by: Option<i32>,
}

impl RecordMatchRequest {
    pub fn new(
        date: NaiveDate,
        venue: impl Into<String>,
        team_1_id: i32,
        team_2_id: i32,
        sets: Vec<SetScore>,
    ) -> Self {
        RecordMatchRequest {
            date,
            venue: venue.into(),
            team_1_id,
            team_2_id,
            sets,
            court: None,
            cost: None,
            discounted: None,
            created_by: None,
        }
    }
}

fn distinct_teams(req: &RecordMatchRequest) -> Result<(), ValidationError> {
    if req.team_1_id == req.team_2_id {
        let mut err = ValidationError::new("same_team");
        err.message = Some(Cow::from("a match needs two different teams"));
        return Err(err);
    }
    Ok(())
}

fn non_negative_points(sets: &[SetScore]) -> Result<(), ValidationError> {
    if sets
        .iter()
        .any(|set| set.team_1_points < 0 || set.team_2_points < 0)
    {
        let mut err = ValidationError::new("negative_points");
        err.message = Some(Cow::from("set points must not be negative"));
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Insertable)]
#[diesel(table_name = partidos)]
pub struct NewMatch<'a> {
    pub fecha: NaiveDate,
    pub lugar: &'a str,
    pub cancha: Option<&'a str>,
    pub costo_partido: Option<i32>,
    pub partido_con_descuento: Option<bool>,
    pub creado_por: Option<i32>,
    pub equipo_1_id: i32,
    pub equipo_2_id: i32,
}

impl<'a> From<&'a RecordMatchRequest> for NewMatch<'a> {
    fn from(req: &'a RecordMatchRequest) -> Self {
        NewMatch {
            fecha: req.date,
            lugar: req.venue.trim(),
            cancha: req.court.as_deref(),
            costo_partido: req.cost,
            partido_con_descuento: req.discounted,
            creado_por: req.created_by,
            equipo_1_id: req.team_1_id,
            equipo_2_id: req.team_2_id,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sets)]
pub struct NewSet {
    pub partido_id: i32,
    pub numero_set: i32,
    pub equipo_1_puntos: i32,
    pub equipo_2_puntos: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = equipos_partidos)]
pub struct NewOutcome<'a> {
    pub partido_id: i32,
    pub equipo_id: i32,
    pub resultado: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = partidos)]
pub struct MatchRow {
    pub id: i32,
    #[diesel(column_name = fecha)]
    pub date: NaiveDate,
    #[diesel(column_name = lugar)]
    pub venue: String,
    #[diesel(column_name = cancha)]
    pub court: Option<String>,
    #[diesel(column_name = costo_partido)]
    pub cost: Option<i32>,
    #[diesel(column_name = partido_con_descuento)]
    pub discounted: Option<bool>,
    #[serde(rename = "createdBy")]
    #[diesel(column_name = creado_por)]
    pub created_by: Option<i32>,
    #[serde(rename = "team1Id")]
    #[diesel(column_name = equipo_1_id)]
    pub team_1_id: i32,
    #[serde(rename = "team2Id")]
    #[diesel(column_name = equipo_2_id)]
    pub team_2_id: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = sets)]
pub struct SetRow {
    pub id: i32,
    #[serde(rename = "matchId")]
    #[diesel(column_name = partido_id)]
    pub match_id: i32,
    #[serde(rename = "setNumber")]
    #[diesel(column_name = numero_set)]
    pub set_number: i32,
    #[serde(rename = "team1Points")]
    #[diesel(column_name = equipo_1_puntos)]
    pub team_1_points: i32,
    #[serde(rename = "team2Points")]
    #[diesel(column_name = equipo_2_puntos)]
    pub team_2_points: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = equipos_partidos)]
pub struct OutcomeRow {
    #[serde(rename = "matchId")]
    #[diesel(column_name = partido_id)]
    pub match_id: i32,
    #[serde(rename = "teamId")]
    #[diesel(column_name = equipo_id)]
    pub team_id: i32,
    #[diesel(column_name = resultado)]
    pub result: String,
}

/// One row of the match roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchListing {
    pub id: i32,
    pub date: NaiveDate,
    pub venue: String,
    #[serde(rename = "team1")]
    pub team_1_name: String,
    #[serde(rename = "team2")]
    pub team_2_name: String,
    #[serde(rename = "team1Result")]
    pub team_1_result: Option<MatchResult>,
    #[serde(rename = "team2Result")]
    pub team_2_result: Option<MatchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(scores: &[(i32, i32)]) -> Vec<SetScore> {
        scores.iter().map(|&(a, b)| SetScore::new(a, b)).collect()
    }

    #[test]
    fn three_set_match_has_a_winner() {
        let tally = SetTally::from_sets(&sets(&[(6, 4), (3, 6), (6, 2)]));
        assert_eq!(tally, SetTally { team_1: 2, team_2: 1 });
        assert_eq!(tally.outcome(), (MatchResult::Winner, MatchResult::Loser));
    }

    #[test]
    fn split_two_set_match_is_a_draw() {
        let tally = SetTally::from_sets(&sets(&[(6, 4), (4, 6)]));
        assert_eq!(tally, SetTally { team_1: 1, team_2: 1 });
        assert_eq!(tally.outcome(), (MatchResult::Draw, MatchResult::Draw));
    }

    #[test]
    fn tied_set_counts_for_nobody() {
        let tally = SetTally::from_sets(&sets(&[(6, 6), (6, 3)]));
        assert_eq!(tally, SetTally { team_1: 1, team_2: 0 });
        assert_eq!(tally.outcome(), (MatchResult::Winner, MatchResult::Loser));
    }

    #[test]
    fn second_team_can_win() {
        let tally = SetTally::from_sets(&sets(&[(2, 6), (6, 7)]));
        assert_eq!(tally.outcome(), (MatchResult::Loser, MatchResult::Winner));
    }

    #[test]
    fn tags_match_stored_values() {
        for result in [MatchResult::Winner, MatchResult::Loser, MatchResult::Draw] {
            assert_eq!(MatchResult::from_tag(result.as_tag()), Some(result));
        }
        assert_eq!(MatchResult::from_tag("Ganadora"), None);
        assert_eq!(
            serde_json::to_string(&MatchResult::Draw).unwrap(),
            "\"Empate\""
        );
    }

    #[test]
    fn request_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ok = RecordMatchRequest::new(date, "Club", 1, 2, sets(&[(6, 1)]));
        assert!(ok.validate().is_ok());

        let same_team = RecordMatchRequest::new(date, "Club", 1, 1, sets(&[(6, 1)]));
        assert!(same_team.validate().is_err());

        let no_sets = RecordMatchRequest::new(date, "Club", 1, 2, vec![]);
        assert!(no_sets.validate().is_err());

        let four_sets = RecordMatchRequest::new(date, "Club", 1, 2, sets(&[(6, 1); 4]));
        assert!(four_sets.validate().is_err());

        let negative = RecordMatchRequest::new(date, "Club", 1, 2, sets(&[(-1, 6)]));
        assert!(negative.validate().is_err());

        let mut costly = RecordMatchRequest::new(date, "Club", 1, 2, sets(&[(6, 1)]));
        costly.cost = Some(-10);
        assert!(costly.validate().is_err());
    }
}
