//! Suggestion selector: turns a ranked backlog and an effort tier into an
//! ordered list of candidate task IDs.
//!
//! Tier policy:
//! - `Low`: low-effort IDs in rank order.
//! - `Medium`: medium-effort IDs with low-effort IDs interleaved in.
//! - `High`: high-effort IDs with the medium/low blend interleaved in.
//!
//! The `High` blend is a placeholder policy that extends the medium blend one
//! tier up.

use std::collections::HashSet;

use crate::backlog::{EffortTier, RankedBacklog};
use crate::error::Result;
use crate::interleave::{InterleaveOptions, interleave_with};

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionSelector {
    options: InterleaveOptions,
}

impl SuggestionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InterleaveOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Candidate IDs for `tier`; nothing in `exclude` is ever returned.
    pub fn select(
        &self,
        backlog: &RankedBacklog,
        exclude: &HashSet<String>,
        tier: EffortTier,
    ) -> Result<Vec<String>> {
        let ids = |t: EffortTier| -> Vec<String> {
            backlog
                .tier(t, exclude)
                .map(|r| r.task.id.clone())
                .collect()
        };

        let out = match tier {
            EffortTier::Low => ids(EffortTier::Low),
            EffortTier::Medium => {
                interleave_with(ids(EffortTier::Medium), ids(EffortTier::Low), self.options)?
            }
            EffortTier::High => {
                let medium_low =
                    interleave_with(ids(EffortTier::Medium), ids(EffortTier::Low), self.options)?;
                interleave_with(ids(EffortTier::High), medium_low, self.options)?
            }
        };

        tracing::debug!(%tier, excluded = exclude.len(), candidates = out.len(), "selected suggestions");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::rank_tasks;
    use crate::task::Task;
    use chrono::Utc;

    /// `n` tasks of one effort with strictly decreasing scores (importance 5..1
    /// then urgency), ids `{prefix}{i}`.
    fn tier_tasks(prefix: &str, effort: u8, n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| {
                let importance = 5 - (i as u8 % 5);
                Task::new(format!("{prefix}{i}"), "x")
                    .with_effort(effort)
                    .with_importance(importance)
            })
            .collect()
    }

    fn backlog(tasks: &[Task]) -> RankedBacklog {
        RankedBacklog::new(rank_tasks(tasks, Utc::now()))
    }

    #[test]
    fn low_tier_returns_low_only() {
        let mut tasks = tier_tasks("l", 1, 3);
        tasks.extend(tier_tasks("m", 2, 3));
        let got = SuggestionSelector::new()
            .select(&backlog(&tasks), &HashSet::new(), EffortTier::Low)
            .unwrap();
        assert_eq!(got, vec!["l0", "l1", "l2"]);
    }

    #[test]
    fn medium_tier_interleaves_low_into_medium() {
        let mut tasks = tier_tasks("m", 2, 5);
        tasks.extend(tier_tasks("l", 1, 3));
        tasks.extend(tier_tasks("h", 3, 2));
        let got = SuggestionSelector::new()
            .select(&backlog(&tasks), &HashSet::new(), EffortTier::Medium)
            .unwrap();
        assert_eq!(got, vec!["m0", "m1", "m2", "m3", "l0", "l1", "m4", "l2"]);
    }

    #[test]
    fn high_tier_blends_all_three() {
        let mut tasks = tier_tasks("h", 3, 5);
        tasks.extend(tier_tasks("m", 2, 1));
        tasks.extend(tier_tasks("l", 1, 1));
        let got = SuggestionSelector::new()
            .select(&backlog(&tasks), &HashSet::new(), EffortTier::High)
            .unwrap();
        // medium/low blend is [m0, l0]
        assert_eq!(got, vec!["h0", "h1", "h2", "h3", "m0", "l0", "h4"]);
    }

    #[test]
    fn excluded_ids_never_appear() {
        let mut tasks = tier_tasks("m", 2, 5);
        tasks.extend(tier_tasks("l", 1, 5));
        tasks.extend(tier_tasks("h", 3, 5));
        let b = backlog(&tasks);
        let exclude: HashSet<String> = ["m0", "l1", "h2", "l4"].iter().map(|s| s.to_string()).collect();
        for tier in EffortTier::ALL {
            let got = SuggestionSelector::new().select(&b, &exclude, tier).unwrap();
            assert!(got.iter().all(|id| !exclude.contains(id)), "{tier}: {got:?}");
        }
    }

    #[test]
    fn empty_backlog_yields_nothing() {
        let got = SuggestionSelector::new()
            .select(&backlog(&[]), &HashSet::new(), EffortTier::High)
            .unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn rejects_zero_stride() {
        assert!(SuggestionSelector::with_options(InterleaveOptions { stride: 0, chunk_size: 2 }).is_err());
    }
}
