use serde::{Deserialize, Serialize};

use super::CandidateId;

/// A candidate standing for election. Identity is by `id` alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate unique ID.
    pub id: CandidateId,
    /// Display name.
    pub name: String,
    /// Party the candidate stands for.
    pub party: String,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(id: impl Into<String>, name: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            party: party.into(),
        }
    }
}
