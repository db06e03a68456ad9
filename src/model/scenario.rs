//! Replay of a recorded election: candidates, raw voter records, a vote log
//! and optionally a region tree, as found in a JSON dump.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::model::{
    candidate::Candidate,
    election::{CandidateResult, ElectionRegistry, VoteError, VoteReceipt},
    region::count_votes_bounded,
    tally::{tally_all, Tally},
    voter::{RegistrationError, ValidationRules, VoteValidator, Voter},
};

/// A recorded election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionScenario {
    pub candidates: Vec<Candidate>,
    /// Raw voter records; these are validated before registration.
    #[serde(default)]
    pub voters: Vec<Value>,
    /// Votes in the order they were cast.
    #[serde(default)]
    pub votes: Vec<VoteReceipt>,
    /// Optional region breakdown of the turnout.
    #[serde(default)]
    pub regions: Option<Value>,
}

/// A voter record that was refused registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// Position of the record in the scenario's voter list.
    pub index: usize,
    /// The record's ID, if it had a string one.
    pub voter_id: Option<String>,
    pub reason: RegistrationError,
}

/// A vote from the log that was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedVote {
    pub vote: VoteReceipt,
    pub reason: VoteError,
}

/// Everything learned from replaying a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub results: Vec<CandidateResult>,
    pub winner: Option<Candidate>,
    pub rejections: Vec<Rejection>,
    pub failed_votes: Vec<FailedVote>,
    /// Tally rebuilt from the accepted votes alone.
    pub replayed_tally: Tally,
    /// Total from the region tree, if one was given.
    pub region_votes: Option<i64>,
}

impl ElectionScenario {
    /// Load a scenario from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let scenario = serde_json::from_reader(file)?;
        Ok(scenario)
    }

    /// Run the election: register every acceptable voter, then replay the
    /// votes in order.
    pub fn run(&self, rules: &ValidationRules, max_region_depth: usize) -> Result<ScenarioOutcome> {
        let validator = VoteValidator::new(rules.clone());
        let mut registry = ElectionRegistry::with_rules(self.candidates.clone(), rules.clone());

        // Register the voters.
        let mut rejections = Vec::new();
        for (index, record) in self.voters.iter().enumerate() {
            if let Err(reason) = Self::register(&validator, &mut registry, record) {
                let voter_id = record.get("id").and_then(Value::as_str).map(String::from);
                debug!("Rejected voter record {index}: {reason}");
                rejections.push(Rejection {
                    index,
                    voter_id,
                    reason,
                });
            }
        }
        info!(
            "Registered {} of {} voters",
            self.voters.len() - rejections.len(),
            self.voters.len()
        );

        // Replay the votes, keeping the accepted ones for an independent tally.
        let mut failed_votes = Vec::new();
        let mut accepted = Vec::new();
        for vote in &self.votes {
            registry.cast_vote_with(
                &vote.voter_id,
                &vote.candidate_id,
                |receipt| accepted.push(receipt.candidate_id),
                |reason| {
                    failed_votes.push(FailedVote {
                        vote: vote.clone(),
                        reason,
                    })
                },
            );
        }
        if !failed_votes.is_empty() {
            warn!("{} of {} votes were refused", failed_votes.len(), self.votes.len());
        }

        // The replayed tally must agree with the registry's own counts.
        let replayed_tally = tally_all(&accepted);
        debug_assert!(replayed_tally
            .iter()
            .all(|(id, votes)| registry.tally().get(id) == Some(votes)));

        let region_votes = self
            .regions
            .as_ref()
            .map(|tree| count_votes_bounded(tree, max_region_depth))
            .transpose()?;

        let winner = registry.winner().cloned();
        match &winner {
            Some(w) => info!("Winner: {} ({})", w.name, w.party),
            None => info!("No winner"),
        }

        Ok(ScenarioOutcome {
            results: registry.results(),
            winner,
            rejections,
            failed_votes,
            replayed_tally,
            region_votes,
        })
    }

    /// Validate a raw record, then place it on the roll.
    fn register(
        validator: &VoteValidator,
        registry: &mut ElectionRegistry,
        record: &Value,
    ) -> std::result::Result<(), RegistrationError> {
        validator.validate(record)?;
        let voter: Voter = serde_json::from_value(record.clone())
            .map_err(|_| RegistrationError::InvalidVoter)?;
        registry.register(&voter)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;

    fn example() -> ElectionScenario {
        serde_json::from_value(json!({
            "candidates": [
                {"id": "C1", "name": "Sarpanch Ram", "party": "Janata"},
                {"id": "C2", "name": "Pradhan Sita", "party": "Lok"}
            ],
            "voters": [
                {"id": "V1", "name": "Mohan", "age": 25},
                {"id": "V2", "name": "Radha", "age": 40},
                {"id": "V3", "name": "Kishan", "age": 33},
                {"id": "V9", "name": "Kid", "age": 17},
                {"id": "V1", "name": "Mohan again", "age": 25},
                {"name": "No ID", "age": 50},
                "not a voter"
            ],
            "votes": [
                {"voterId": "V1", "candidateId": "C2"},
                {"voterId": "V2", "candidateId": "C2"},
                {"voterId": "V3", "candidateId": "C1"},
                {"voterId": "V1", "candidateId": "C1"},
                {"voterId": "V9", "candidateId": "C1"},
                {"voterId": "V2", "candidateId": "C7"}
            ],
            "regions": {
                "votes": 1,
                "subRegions": [{"votes": 2}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn replay() {
        log4rs_test_utils::test_logging::init_logging_once_for(
            ["panchayat_election"],
            None,
            None,
        );

        let outcome = example().run(&ValidationRules::default(), 8).unwrap();

        let tallies: Vec<_> = outcome.results.iter().map(|r| (r.id.as_str(), r.votes)).collect();
        assert_eq!(tallies, [("C2", 2), ("C1", 1)]);
        assert_eq!(outcome.winner, Some(Candidate::example2()));
        assert_eq!(
            outcome.replayed_tally,
            Tally::from([("C1".to_string(), 1), ("C2".to_string(), 2)])
        );
        assert_eq!(outcome.region_votes, Some(3));

        let reasons: Vec<_> = outcome
            .rejections
            .iter()
            .map(|r| (r.index, r.voter_id.as_deref(), r.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            [
                (3, Some("V9"), RegistrationError::Underage),
                (4, Some("V1"), RegistrationError::AlreadyRegistered),
                (5, None, RegistrationError::MissingField("id".to_string())),
                (6, None, RegistrationError::InvalidVoter),
            ]
        );

        let reasons: Vec<_> = outcome
            .failed_votes
            .iter()
            .map(|f| (f.vote.voter_id.as_str(), f.reason))
            .collect();
        assert_eq!(
            reasons,
            [
                ("V1", VoteError::AlreadyVoted),
                ("V9", VoteError::NotRegistered),
                ("V2", VoteError::NoSuchCandidate),
            ]
        );
    }

    #[test]
    fn stricter_rules() {
        let rules = ValidationRules {
            min_age: 30,
            ..Default::default()
        };
        let outcome = example().run(&rules, 8).unwrap();
        // Only Radha and Kishan are old enough.
        let tallies: Vec<_> = outcome.results.iter().map(|r| (r.id.as_str(), r.votes)).collect();
        assert_eq!(tallies, [("C1", 1), ("C2", 1)]);
        assert_eq!(outcome.winner, Some(Candidate::example1()));
    }

    #[test]
    fn ages_written_as_floats() {
        let scenario: ElectionScenario = serde_json::from_value(json!({
            "candidates": [{"id": "C1", "name": "Sarpanch Ram", "party": "Janata"}],
            "voters": [
                {"id": "V1", "name": "Mohan", "age": 30.0},
                {"id": "V2", "name": "Radha", "age": 18.5},
                {"id": "V3", "name": "Kid", "age": 17.9}
            ],
            "votes": [
                {"voterId": "V1", "candidateId": "C1"},
                {"voterId": "V2", "candidateId": "C1"}
            ]
        }))
        .unwrap();
        let outcome = scenario.run(&ValidationRules::default(), 8).unwrap();

        let reasons: Vec<_> = outcome
            .rejections
            .iter()
            .map(|r| (r.index, r.reason.clone()))
            .collect();
        assert_eq!(reasons, [(2, RegistrationError::Underage)]);
        assert!(outcome.failed_votes.is_empty());
        assert_eq!(outcome.results[0].votes, 2);
        assert_eq!(outcome.winner, Some(Candidate::example1()));
    }

    #[test]
    fn no_votes() {
        let scenario: ElectionScenario = serde_json::from_value(json!({
            "candidates": [{"id": "C1", "name": "Sarpanch Ram", "party": "Janata"}]
        }))
        .unwrap();
        let outcome = scenario.run(&ValidationRules::default(), 8).unwrap();
        assert_eq!(outcome.winner, None);
        assert!(outcome.replayed_tally.is_empty());
        assert_eq!(outcome.region_votes, None);
    }

    #[test]
    fn region_too_deep() {
        let mut scenario = example();
        scenario.regions = Some(json!({"subRegions": [{"subRegions": [{"votes": 1}]}]}));
        assert!(matches!(
            scenario.run(&ValidationRules::default(), 1),
            Err(Error::RegionTooDeep { max_depth: 1 })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            ElectionScenario::from_file("not a real file"),
            Err(Error::Io(_))
        ));
    }
}
