use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{candidate::Candidate, CandidateId, VoterId};

/// Proof that a vote was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
}

/// Reasons a vote can be refused. Checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum VoteError {
    #[error("Voter not registered")]
    NotRegistered,
    #[error("Candidate does not exist")]
    NoSuchCandidate,
    #[error("Voter already voted")]
    AlreadyVoted,
}

/// The standing of a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub votes: u64,
}

impl CandidateResult {
    pub fn new(candidate: &Candidate, votes: u64) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            party: candidate.party.clone(),
            votes,
        }
    }

    /// Default ranking: most votes first. Equal votes compare equal, so a
    /// stable sort leaves them in candidate order.
    pub fn by_votes_descending(a: &Self, b: &Self) -> Ordering {
        b.votes.cmp(&a.votes)
    }
}

impl Display for CandidateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {} vote{}",
            self.name,
            self.party,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons() {
        assert_eq!(VoteError::NotRegistered.to_string(), "Voter not registered");
        assert_eq!(
            VoteError::NoSuchCandidate.to_string(),
            "Candidate does not exist"
        );
        assert_eq!(VoteError::AlreadyVoted.to_string(), "Voter already voted");
    }

    #[test]
    fn display() {
        let mut result = CandidateResult::new(&Candidate::example1(), 1);
        assert_eq!(result.to_string(), "Sarpanch Ram (Janata): 1 vote");
        result.votes = 3;
        assert_eq!(result.to_string(), "Sarpanch Ram (Janata): 3 votes");
    }

    #[test]
    fn receipt_json() {
        let receipt = VoteReceipt {
            voter_id: "V1".to_string(),
            candidate_id: "C1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            serde_json::json!({"voterId": "V1", "candidateId": "C1"})
        );
    }
}
