//! Film demo entity used by the CRUD walkthrough.
//!
//! All three columns are text, including `year`, so every approach stores
//! and compares the same values.

use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Table name shared by every CRUD approach.
pub const FILMS_TABLE: &str = "films";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub director: String,
    pub year: String,
}

impl Film {
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            director: director.into(),
            year: year.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("director", &self.director)?;
        require_text("year", &self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::Film;
    use crate::model::validation::ValidationError;

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(Film::new("1917", "Sam Mendes", "2019").validate().is_ok());
        assert_eq!(
            Film::new("1917", "", "2019").validate(),
            Err(ValidationError::EmptyField("director"))
        );
    }
}
