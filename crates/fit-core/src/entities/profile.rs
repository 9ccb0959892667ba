use serde::{Deserialize, Serialize};

use super::WeightRecord;

/// A user with a display name and a weight history.
///
/// The weight history is append-only and kept in recording order, not date
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    weight_history: Vec<WeightRecord>,
}

impl UserProfile {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            weight_history: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_history(name: &str, weight_history: Vec<WeightRecord>) -> Self {
        Self {
            name: name.trim().to_string(),
            weight_history,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn add_weight_record(&mut self, record: WeightRecord) {
        self.weight_history.push(record);
    }

    #[must_use]
    pub fn weight_history(&self) -> &[WeightRecord] {
        &self.weight_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn history_keeps_recording_order() {
        let mut profile = UserProfile::new("Loan");
        let d = |day| NaiveDate::from_ymd_opt(2025, 10, day).unwrap();

        // Recorded out of date order on purpose.
        profile.add_weight_record(WeightRecord::new(51.0, d(20)).unwrap());
        profile.add_weight_record(WeightRecord::new(50.5, d(10)).unwrap());

        let dates: Vec<_> = profile.weight_history().iter().map(WeightRecord::date).collect();
        assert_eq!(dates, vec![d(20), d(10)]);
    }
}
