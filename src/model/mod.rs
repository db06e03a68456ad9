pub mod candidate;
pub mod election;
pub mod region;
pub mod scenario;
pub mod tally;
pub mod voter;

/// Our candidate IDs are strings.
pub type CandidateId = String;
/// Our voter IDs are strings.
pub type VoterId = String;
