pub use registry::ElectionRegistry;
pub use results::{CandidateResult, VoteError, VoteReceipt};

mod registry;
mod results;
