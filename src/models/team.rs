use std::borrow::Cow;

use crate::models::non_blank;
use crate::models::schema::{equipos, jugadores_equipos};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = equipos)]
pub struct Team {
    pub id: i32,
    #[diesel(column_name = nombre)]
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = jugadores_equipos)]
pub struct Membership {
    #[serde(rename = "teamId")]
    #[diesel(column_name = equipo_id)]
    pub team_id: i32,
    #[serde(rename = "playerId")]
    #[diesel(column_name = usuario_id)]
    pub player_id: i32,
    #[diesel(column_name = estado_de_pago)]
    pub paid: Option<bool>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = equipos)]
pub struct NewTeam<'a> {
    #[diesel(column_name = nombre)]
    pub name: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = jugadores_equipos)]
pub struct NewMembership {
    #[diesel(column_name = equipo_id)]
    pub team_id: i32,
    #[diesel(column_name = usuario_id)]
    pub player_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "distinct_players"))]
pub struct CreateTeamRequest {
    #[validate(custom = "non_blank")]
    pub name: String,
    pub player_1_id: i32,
    pub player_2_id: i32,
}

fn distinct_players(req: &CreateTeamRequest) -> Result<(), ValidationError> {
    if req.player_1_id == req.player_2_id {
        let mut err = ValidationError::new("same_player");
        err.message = Some(Cow::from("a team needs two different players"));
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaymentStatusRequest {
    pub paid: bool,
}

/// One row of the team roster. Members are ordered by player id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamListing {
    #[serde(rename = "teamId")]
    pub team_id: i32,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "player1")]
    pub player_1_name: String,
    #[serde(rename = "player2")]
    pub player_2_name: String,
}
