use serde::{Deserialize, Serialize};
use crate::dtos::numeric::NumericInput;
use crate::error::AppError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<NumericInput>,
    #[serde(default)]
    pub comment: String,
}

impl ReviewRequest {
    /// Returns the rating once it is known to be within 1..=5.
    pub fn checked_rating(&self) -> Result<i32, AppError> {
        let rating = match &self.rating {
            Some(value) if !value.is_blank() => value
                .as_i32()
                .ok_or_else(|| AppError::validation("rating must be a whole number"))?,
            _ => return Err(AppError::validation("rating is required")),
        };
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        Ok(rating)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
