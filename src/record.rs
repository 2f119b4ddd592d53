//! The vehicle record and its closed condition vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical condition of a vehicle.
///
/// The text form written to disk is the canonical lowercase name
/// (`minordamages`, `majordamages`, ...). The hyphenated spellings
/// `minor-damage` / `major-damage` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    MinorDamages,
    MajorDamages,
}

impl Condition {
    /// Every condition, in severity order.
    pub const ALL: [Condition; 5] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::MinorDamages,
        Condition::MajorDamages,
    ];

    /// Canonical on-disk spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::MinorDamages => "minordamages",
            Condition::MajorDamages => "majordamages",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name one of the five conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown condition '{}' (allowed: excellent, good, fair, minordamages, majordamages)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(Condition::Excellent),
            "good" => Ok(Condition::Good),
            "fair" => Ok(Condition::Fair),
            "minordamages" | "minor-damage" => Ok(Condition::MinorDamages),
            "majordamages" | "major-damage" => Ok(Condition::MajorDamages),
            other => Err(UnknownCondition(other.to_string())),
        }
    }
}

/// One vehicle in the fleet.
///
/// `status` is free text: [`CarRecord::AVAILABLE`] means the car can be
/// rented, anything else (conventionally `"Rented by user <id>"`) means it
/// is out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: String,
    pub model: String,
    pub condition: Condition,
    pub price_per_day: f64,
    pub status: String,
}

impl CarRecord {
    /// Status sentinel for a car that is not rented.
    pub const AVAILABLE: &'static str = "Available";

    /// Prefix of the status marker written when a car is rented.
    pub const RENTED_PREFIX: &'static str = "Rented by user ";

    /// Build an available record.
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        condition: Condition,
        price_per_day: f64,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            condition,
            price_per_day,
            status: Self::AVAILABLE.to_string(),
        }
    }

    /// Replace the status (builder style).
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Self::AVAILABLE
    }

    /// Mark the car as rented by `user_id`.
    pub fn mark_rented(&mut self, user_id: &str) {
        self.status = format!("{}{user_id}", Self::RENTED_PREFIX);
    }

    pub fn mark_available(&mut self) {
        self.status = Self::AVAILABLE.to_string();
    }

    /// The renting user's id, if the status carries the standard marker.
    #[must_use]
    pub fn renter(&self) -> Option<&str> {
        self.status.strip_prefix(Self::RENTED_PREFIX)
    }
}
