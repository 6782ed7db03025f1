use crate::models::non_blank;
use crate::models::schema::usuarios;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = usuarios)]
pub struct Player {
    pub id: i32,
    #[diesel(column_name = nombre)]
    pub name: String,
    pub nickname: String,
    #[serde(rename = "registeredAt")]
    #[diesel(column_name = fecha_registro)]
    pub registered_at: chrono::NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = usuarios)]
pub struct NewPlayer<'a> {
    #[diesel(column_name = nombre)]
    pub name: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPlayerRequest {
    #[validate(custom = "non_blank")]
    pub name: String,
    #[validate(custom = "non_blank")]
    pub nickname: String,
}

impl RegisterPlayerRequest {
    pub fn new(name: impl Into<String>, nickname: impl Into<String>) -> Self {
        RegisterPlayerRequest {
            name: name.into(),
            nickname: nickname.into(),
        }
    }
}

/// One row of the player roster.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable)]
pub struct PlayerListing {
    pub name: String,
    pub nickname: String,
    #[serde(rename = "registeredAt")]
    pub registered_at: chrono::NaiveDateTime,
}
