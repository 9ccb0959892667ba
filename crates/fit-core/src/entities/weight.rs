use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single body-weight measurement in kilograms, taken on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    weight_kg: f64,
    date: NaiveDate,
}

impl WeightRecord {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the weight is not a positive
    /// finite number.
    pub fn new(weight_kg: f64, date: NaiveDate) -> Result<Self, CoreError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(CoreError::Validation(format!(
                "weight must be a positive number, got {weight_kg}"
            )));
        }
        Ok(Self { weight_kg, date })
    }

    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for WeightRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {} | Weight: {:.1} kg",
            self.date.format("%d/%m/%y"),
            self.weight_kg
        )
    }
}
