//! RankedBacklog: ranked tasks bucketed by effort tier.
//!
//! Purpose:
//! - Give the suggestion selector per-tier candidate lists without re-scanning
//!   or re-sorting the whole ranking for every suggestion round.
//! - Stay fully deterministic: buckets keep the ranker's order.
//!
//! Buckets:
//! - effort 1 (low), 2 (medium), 3 (high)

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TasketError};
use crate::rank::RankedTask;

/// Effort bucket, shared by task effort and remaining daily capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffortTier {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl EffortTier {
    pub const ALL: [EffortTier; 3] = [EffortTier::Low, EffortTier::Medium, EffortTier::High];

    /// Tier matching the remaining capacity, or `None` once it's used up.
    /// Capacity above 3 maps to `High`.
    pub fn for_capacity(remaining: i32) -> Option<Self> {
        match remaining {
            r if r <= 0 => None,
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            _ => Some(Self::High),
        }
    }
}

impl TryFrom<u8> for EffortTier {
    type Error = TasketError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(TasketError::validation(
                "effort",
                format!("must be 1..=3, got {other}"),
            )),
        }
    }
}

impl fmt::Display for EffortTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default, Clone)]
pub struct RankedBacklog {
    ranked: Vec<RankedTask>,

    // buckets[tier] = positions into `ranked`, in rank order
    buckets: HashMap<EffortTier, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl RankedBacklog {
    /// Bucket an already ranked sequence. Tasks with an effort outside 1..=3 are
    /// kept for lookup but never offered.
    pub fn new(ranked: Vec<RankedTask>) -> Self {
        let mut buckets: HashMap<EffortTier, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(ranked.len());

        for (pos, r) in ranked.iter().enumerate() {
            by_id.insert(r.task.id.clone(), pos);
            match EffortTier::try_from(r.effort()) {
                Ok(tier) => buckets.entry(tier).or_default().push(pos),
                Err(_) => tracing::warn!(id = %r.task.id, effort = r.effort(), "task has no effort tier"),
            }
        }

        Self {
            ranked,
            buckets,
            by_id,
        }
    }

    pub fn get(&self, id: &str) -> Option<&RankedTask> {
        self.by_id.get(id).map(|&pos| &self.ranked[pos])
    }

    /// Tier members in rank order, skipping anything in `exclude`.
    pub fn tier<'a>(
        &'a self,
        tier: EffortTier,
        exclude: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a RankedTask> + 'a {
        self.buckets
            .get(&tier)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.ranked[pos])
            .filter(move |r| !exclude.contains(&r.task.id))
    }
}
