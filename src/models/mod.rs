use std::borrow::Cow;

use validator::ValidationError;

pub mod admin;
pub mod match_record;
pub mod player;
pub mod response;
pub mod schema;
pub mod team;

pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be blank"));
        return Err(err);
    }
    Ok(())
}
