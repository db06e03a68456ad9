use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{
    candidate::Candidate,
    tally::Tally,
    voter::{RegistrationError, ValidationRules, VoteValidator, Voter},
    CandidateId, VoterId,
};

use super::results::{CandidateResult, VoteError, VoteReceipt};

/// The state of a single election: who is standing, who may vote, who has
/// voted, and the running count for each candidate.
///
/// Each voter moves one way through `unregistered -> registered -> voted`.
/// The containers are private; all changes go through [`Self::register`] and
/// [`Self::cast_vote`].
#[derive(Debug, Clone)]
pub struct ElectionRegistry {
    /// Candidates in the order they were supplied.
    candidates: Vec<Candidate>,
    /// Keys are exactly the supplied candidate IDs, for the registry's lifetime.
    vote_counts: HashMap<CandidateId, u64>,
    registered_voters: HashSet<VoterId>,
    /// Always a subset of `registered_voters`.
    voted_voters: HashSet<VoterId>,
    validator: VoteValidator,
}

impl ElectionRegistry {
    /// Create a registry for the given candidates with the default
    /// eligibility rules. An empty candidate list is accepted, but such an
    /// election can never have a winner.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self::with_rules(candidates, ValidationRules::default())
    }

    /// Create a registry with custom eligibility rules.
    pub fn with_rules(candidates: Vec<Candidate>, rules: ValidationRules) -> Self {
        let vote_counts = candidates.iter().map(|c| (c.id.clone(), 0)).collect();
        debug!("Created election with {} candidates", candidates.len());
        Self {
            candidates,
            vote_counts,
            registered_voters: HashSet::new(),
            voted_voters: HashSet::new(),
            validator: VoteValidator::new(rules),
        }
    }

    /// Place a voter on the roll, reporting why if they are refused.
    /// Nothing changes on failure.
    pub fn register(&mut self, voter: &Voter) -> Result<(), RegistrationError> {
        self.validator.check(voter)?;
        if !self.registered_voters.insert(voter.id.clone()) {
            return Err(RegistrationError::AlreadyRegistered);
        }
        debug!("Registered voter {}", voter.id);
        Ok(())
    }

    /// Place a voter on the roll. Returns `false` if they were refused.
    pub fn register_voter(&mut self, voter: &Voter) -> bool {
        self.register(voter).is_ok()
    }

    /// Record a vote.
    ///
    /// The voter must be registered, the candidate must be standing, and the
    /// voter must not have voted yet; the first failing check is reported.
    pub fn cast_vote(
        &mut self,
        voter_id: &str,
        candidate_id: &str,
    ) -> Result<VoteReceipt, VoteError> {
        if !self.registered_voters.contains(voter_id) {
            return Err(VoteError::NotRegistered);
        }
        let count = self
            .vote_counts
            .get_mut(candidate_id)
            .ok_or(VoteError::NoSuchCandidate)?;
        if self.voted_voters.contains(voter_id) {
            return Err(VoteError::AlreadyVoted);
        }

        *count += 1;
        self.voted_voters.insert(voter_id.to_string());
        debug!("Voter {voter_id} voted for {candidate_id}");
        Ok(VoteReceipt {
            voter_id: voter_id.to_string(),
            candidate_id: candidate_id.to_string(),
        })
    }

    /// Record a vote and hand the outcome to exactly one of the callbacks,
    /// returning whatever that callback returns.
    pub fn cast_vote_with<R>(
        &mut self,
        voter_id: &str,
        candidate_id: &str,
        on_success: impl FnOnce(VoteReceipt) -> R,
        on_error: impl FnOnce(VoteError) -> R,
    ) -> R {
        match self.cast_vote(voter_id, candidate_id) {
            Ok(receipt) => on_success(receipt),
            Err(err) => on_error(err),
        }
    }

    /// Current standings, most votes first. Candidates with equal votes stay
    /// in the order they were supplied.
    pub fn results(&self) -> Vec<CandidateResult> {
        self.results_by(CandidateResult::by_votes_descending)
    }

    /// Current standings ordered by a custom comparator. The sort is stable,
    /// starting from the order the candidates were supplied.
    pub fn results_by<F>(&self, compare: F) -> Vec<CandidateResult>
    where
        F: FnMut(&CandidateResult, &CandidateResult) -> Ordering,
    {
        let mut results: Vec<_> = self
            .candidates
            .iter()
            .map(|c| CandidateResult::new(c, self.votes_for(&c.id)))
            .collect();
        results.sort_by(compare);
        results
    }

    /// The leading candidate, or `None` if there are no candidates or no
    /// votes have been cast. Ties go to the earliest supplied candidate.
    pub fn winner(&self) -> Option<&Candidate> {
        let top = self.results().into_iter().next()?;
        if top.votes == 0 {
            return None;
        }
        self.candidates.iter().find(|c| c.id == top.id)
    }

    /// The candidates, in the order they were supplied.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Is the given voter on the roll?
    pub fn is_registered(&self, voter_id: &str) -> bool {
        self.registered_voters.contains(voter_id)
    }

    /// Has the given voter already voted?
    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.voted_voters.contains(voter_id)
    }

    /// Total votes cast so far.
    pub fn turnout(&self) -> usize {
        self.voted_voters.len()
    }

    /// A copy of the current counts.
    pub fn tally(&self) -> Tally {
        self.vote_counts
            .iter()
            .map(|(id, votes)| (id.clone(), *votes))
            .collect()
    }

    fn votes_for(&self, candidate_id: &str) -> u64 {
        self.vote_counts.get(candidate_id).copied().unwrap_or(0)
    }
}
