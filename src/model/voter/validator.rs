use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RegistrationError, Voter};

/// Eligibility rules applied to voters before they may register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Minimum age in years.
    pub min_age: u32,
    /// Keys that must be present on a raw voter record.
    pub required_fields: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_age: 18,
            required_fields: ["id", "name", "age"].map(String::from).to_vec(),
        }
    }
}

/// A validator built once from a set of rules and then applied to any number
/// of voters.
#[derive(Debug, Clone, Default)]
pub struct VoteValidator {
    rules: ValidationRules,
}

impl VoteValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Check a raw, untrusted voter record.
    ///
    /// Checks run in order: the record must be an object or an array, every
    /// required field must be present (its value is not inspected), and `age`
    /// must be a number no smaller than the minimum age. An array has no named
    /// fields, so it fails on the first required field, or on its age if no
    /// fields are required.
    pub fn validate(&self, record: &Value) -> Result<(), RegistrationError> {
        let fields = match record {
            Value::Object(fields) => Some(fields),
            Value::Array(_) => None,
            _ => return Err(RegistrationError::InvalidVoter),
        };
        let has_field = |field: &str| fields.map_or(false, |f| f.contains_key(field));

        if let Some(missing) = self
            .rules
            .required_fields
            .iter()
            .find(|field| !has_field(field.as_str()))
        {
            return Err(RegistrationError::MissingField(missing.clone()));
        }

        match fields.and_then(|f| f.get("age")).and_then(Value::as_f64) {
            Some(age) if age >= f64::from(self.rules.min_age) => Ok(()),
            _ => Err(RegistrationError::Underage),
        }
    }

    /// Check a typed voter: ID and name must be non-empty and the age must
    /// reach the minimum.
    pub fn check(&self, voter: &Voter) -> Result<(), RegistrationError> {
        if voter.id.is_empty() || voter.name.is_empty() {
            return Err(RegistrationError::InvalidVoter);
        }
        if voter.age < self.rules.min_age {
            return Err(RegistrationError::Underage);
        }
        Ok(())
    }
}
