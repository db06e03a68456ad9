//! Vote totals over nested regions (village, block, district, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

const VOTES: &str = "votes";
const SUB_REGIONS: &str = "subRegions";

/// A well-formed region tree. Owned trees cannot contain cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Region {
    pub name: String,
    pub votes: u64,
    pub sub_regions: Vec<Region>,
}

impl Region {
    pub fn new(name: impl Into<String>, votes: u64, sub_regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            votes,
            sub_regions,
        }
    }

    /// Votes in this region and everything below it.
    pub fn total_votes(&self) -> u64 {
        self.sub_regions
            .iter()
            .fold(self.votes, |acc, r| acc.saturating_add(r.total_votes()))
    }
}

/// Votes recorded directly on a raw node. Fractions are truncated toward
/// zero; anything that is not a number counts as zero.
fn own_votes(node: &Value) -> i64 {
    match node.get(VOTES) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Child nodes of a raw node. A missing or non-array `subRegions` has none.
fn sub_regions(node: &Value) -> &[Value] {
    node.get(SUB_REGIONS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Sum the votes over a raw, untrusted region tree.
///
/// Never fails: a node that is not an object contributes nothing, as do
/// non-numeric `votes` and non-array `subRegions`. Recursion depth follows
/// the tree, so deeply nested input should go through
/// [`count_votes_bounded`] instead.
pub fn count_votes(node: &Value) -> i64 {
    if !node.is_object() {
        return 0;
    }
    sub_regions(node)
        .iter()
        .fold(own_votes(node), |acc, child| {
            acc.saturating_add(count_votes(child))
        })
}

/// As [`count_votes`], but iterative, and refusing trees nested deeper than
/// `max_depth` (the root is depth 0).
pub fn count_votes_bounded(node: &Value, max_depth: usize) -> Result<i64> {
    let mut total: i64 = 0;
    let mut stack = vec![(node, 0)];
    while let Some((node, depth)) = stack.pop() {
        if !node.is_object() {
            continue;
        }
        if depth > max_depth {
            warn!("Region tree deeper than {max_depth}, refusing to count");
            return Err(Error::RegionTooDeep { max_depth });
        }
        total = total.saturating_add(own_votes(node));
        stack.extend(sub_regions(node).iter().map(|child| (child, depth + 1)));
    }
    Ok(total)
}
