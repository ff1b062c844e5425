//! Partition selection.
//!
//! `Simple` takes the first segment of the list. `Score` tries every segment
//! as the partition, classifies all the others against it and keeps the
//! cheapest one, where
//!
//! ```text
//! cost = splits + |front - back|
//! ```
//!
//! Splits grow the segment count, imbalance grows the depth. Scoring is
//! O(n²) per tree level, which is fine for the hundreds to low thousands of
//! walls a map carries. Larger inputs should use `Simple` or pre-merge their
//! walls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bsp::{classify, SegArena, SegHandle, SegPosition};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Simple,
    #[default]
    Score,
}

impl FromStr for SplitMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(SplitMethod::Simple),
            "score" => Ok(SplitMethod::Score),
            other => Err(ConfigError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMethod::Simple => f.write_str("simple"),
            SplitMethod::Score => f.write_str("score"),
        }
    }
}

/// Counts from classifying a list against one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionCost {
    pub front: usize,
    pub back: usize,
    pub splits: usize,
}

impl PartitionCost {
    pub fn score(&self) -> usize {
        self.splits + self.front.abs_diff(self.back)
    }
}

/// The chosen partition: its position in the list and, for `Score`, its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionChoice {
    pub index: usize,
    pub cost: Option<PartitionCost>,
}

impl PartitionChoice {
    pub fn handle(&self, segs: &[SegHandle]) -> SegHandle {
        segs[self.index]
    }
}

/// Classify every segment of `segs` except the one at `candidate` against it.
pub fn partition_cost(arena: &SegArena, segs: &[SegHandle], candidate: usize) -> PartitionCost {
    let partition = &arena[segs[candidate]];
    let mut cost = PartitionCost::default();
    for (i, &handle) in segs.iter().enumerate() {
        if i == candidate {
            continue;
        }
        match classify(&arena[handle], partition) {
            SegPosition::Front => cost.front += 1,
            SegPosition::Back => cost.back += 1,
            SegPosition::Split => cost.splits += 1,
        }
    }
    cost
}

/// Pick a partition from `segs`. Returns `None` for an empty list.
pub fn choose_partition(method: SplitMethod, arena: &SegArena, segs: &[SegHandle]) -> Option<PartitionChoice> {
    if segs.is_empty() {
        return None;
    }

    match method {
        SplitMethod::Simple => Some(PartitionChoice { index: 0, cost: None }),
        SplitMethod::Score => {
            let mut best: Option<(usize, PartitionCost)> = None;
            for candidate in 0..segs.len() {
                let cost = partition_cost(arena, segs, candidate);
                // Strict comparison keeps the first minimum on ties.
                if best.map_or(true, |(_, b)| cost.score() < b.score()) {
                    best = Some((candidate, cost));
                }
            }
            best.map(|(index, cost)| PartitionChoice {
                index,
                cost: Some(cost),
            })
        }
    }
}
