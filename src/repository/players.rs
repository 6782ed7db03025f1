use crate::error::RegistryError;
use crate::models::player::{NewPlayer, Player};
use crate::models::schema::usuarios;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};

pub trait PlayerStore {
    fn insert_player(&mut self, player: &NewPlayer<'_>) -> Result<i32, RegistryError>;

    fn find_player_by_nickname(&mut self, nickname: &str)
        -> Result<Option<Player>, RegistryError>;
}

macro_rules! impl_player_store {
    ($conn:ty) => {
        impl PlayerStore for $conn {
            fn insert_player(&mut self, player: &NewPlayer<'_>) -> Result<i32, RegistryError> {
                diesel::insert_into(usuarios::table)
                    .values(player)
                    .returning(usuarios::id)
                    .get_result::<i32>(self)
                    .map_err(|err| RegistryError::write("player", err))
            }

            fn find_player_by_nickname(
                &mut self,
                nickname: &str,
            ) -> Result<Option<Player>, RegistryError> {
                usuarios::table
                    .filter(usuarios::nickname.eq(nickname))
                    .select(Player::as_select())
                    .first(self)
                    .optional()
                    .map_err(|err| RegistryError::read("player", err))
            }
        }
    };
}

impl_player_store!(diesel::SqliteConnection);
#[cfg(feature = "postgres")]
impl_player_store!(diesel::PgConnection);
