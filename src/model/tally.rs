//! A pure, event-sourced alternative to the counts kept by
//! [`crate::model::election::ElectionRegistry`].

use std::collections::BTreeMap;

use super::CandidateId;

/// Maps candidate IDs to their accumulated vote counts.
pub type Tally = BTreeMap<CandidateId, u64>;

/// Return a new tally with one more vote for `candidate_id`.
///
/// The current tally is only borrowed, so the caller's copy is never touched.
/// No tally at all is treated the same as an empty one, and an unknown
/// candidate simply starts at 1.
pub fn tally<'a>(current: impl Into<Option<&'a Tally>>, candidate_id: &str) -> Tally {
    let mut next = current.into().cloned().unwrap_or_default();
    *next.entry(candidate_id.to_string()).or_insert(0) += 1;
    next
}

/// Replay a log of votes from an empty tally.
pub fn tally_all<I, S>(candidate_ids: I) -> Tally
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidate_ids
        .into_iter()
        .fold(Tally::new(), |acc, id| tally(&acc, id.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_without_mutating() {
        let empty = Tally::new();
        let one = tally(&empty, "C1");
        assert!(empty.is_empty());
        assert_eq!(one, Tally::from([("C1".to_string(), 1)]));

        let two = tally(&one, "C1");
        assert_eq!(one, Tally::from([("C1".to_string(), 1)]));
        assert_eq!(two, Tally::from([("C1".to_string(), 2)]));
    }

    #[test]
    fn unknown_candidate_is_added() {
        let current = Tally::from([("C1".to_string(), 5), ("C2".to_string(), 3)]);
        let next = tally(&current, "C3");
        assert_eq!(next.get("C1"), Some(&5));
        assert_eq!(next.get("C2"), Some(&3));
        assert_eq!(next.get("C3"), Some(&1));
        assert_eq!(current.len(), 2);
    }

    #[test]
    fn absent_tally() {
        assert_eq!(tally(None, "C1"), tally(&Tally::new(), "C1"));
        assert_eq!(tally(None, ""), Tally::from([(String::new(), 1)]));
    }

    #[test]
    fn replay() {
        let log = ["C1", "C2", "C1", "C1"];
        let replayed = tally_all(log);
        assert_eq!(
            replayed,
            Tally::from([("C1".to_string(), 3), ("C2".to_string(), 1)])
        );
        assert_eq!(tally_all(Vec::<String>::new()), Tally::new());
    }
}
