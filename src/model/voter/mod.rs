use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::VoterId;

pub use validator::{ValidationRules, VoteValidator};

mod validator;

/// A person asking to be placed on the electoral roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// Voter unique ID.
    pub id: VoterId,
    /// Voter name.
    pub name: String,
    /// Voter age in whole years.
    #[serde(deserialize_with = "whole_years")]
    pub age: u32,
}

/// Accept any non-negative number as an age, keeping only the completed years,
/// so `30.0` and `30.5` both read as 30.
fn whole_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let age = f64::deserialize(deserializer)?;
    if (0.0..=f64::from(u32::MAX)).contains(&age) {
        Ok(age.trunc() as u32)
    } else {
        Err(D::Error::custom(format!("invalid age {age}")))
    }
}

impl Voter {
    /// Create a new voter.
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
        }
    }
}

/// Reasons a voter can be refused registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RegistrationError {
    /// The record is not a voter at all, or has an empty ID or name.
    #[error("Invalid voter object")]
    InvalidVoter,
    /// A required field is absent from the raw record.
    #[error("Missing field: {0}")]
    MissingField(String),
    /// The voter is younger than the minimum age, or their age is not a number.
    #[error("Underage voter")]
    Underage,
    /// The voter ID is already on the roll.
    #[error("Voter already registered")]
    AlreadyRegistered,
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn age_from_json() {
        let voter: Voter =
            serde_json::from_value(json!({"id": "V1", "name": "Mohan", "age": 30})).unwrap();
        assert_eq!(voter, Voter::new("V1", "Mohan", 30));

        let voter: Voter =
            serde_json::from_value(json!({"id": "V1", "name": "Mohan", "age": 30.0})).unwrap();
        assert_eq!(voter.age, 30);

        let voter: Voter =
            serde_json::from_value(json!({"id": "V1", "name": "Mohan", "age": 18.5})).unwrap();
        assert_eq!(voter.age, 18);

        for age in [json!(-1), json!("30"), Value::Null] {
            let record = json!({"id": "V1", "name": "Mohan", "age": age});
            assert!(serde_json::from_value::<Voter>(record).is_err());
        }
    }
}

/// Example test data.
#[cfg(test)]
pub(crate) mod examples {
    use super::*;

    impl Voter {
        pub fn example1() -> Self {
            Self::new("V1", "Mohan", 25)
        }

        pub fn example2() -> Self {
            Self::new("V2", "Radha", 40)
        }

        pub fn example3() -> Self {
            Self::new("V3", "Kishan", 18)
        }

        pub fn underage_example() -> Self {
            Self::new("V9", "Kid", 17)
        }
    }
}
