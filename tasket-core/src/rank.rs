//! Ranker: orders incomplete tasks by relevance score, descending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::Relevance;
use crate::task::Task;

/// A task plus its derived scoring fields and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTask {
    pub task: Task,
    pub relevance: Relevance,
    pub rank: usize,
}

impl RankedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn effort(&self) -> u8 {
        self.task.effort
    }

    pub fn score(&self) -> f64 {
        self.relevance.relevance_score
    }
}

/// Rank incomplete tasks against `now`.
///
/// Completed tasks are dropped. The sort is stable, so exact ties keep input
/// order. Input records are cloned, never mutated.
pub fn rank_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<RankedTask> {
    let mut ranked: Vec<RankedTask> = tasks
        .iter()
        .filter(|t| !t.complete)
        .map(|t| RankedTask {
            task: t.clone(),
            relevance: Relevance::of(t, now),
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));

    for (i, r) in ranked.iter_mut().enumerate() {
        r.rank = i + 1;
    }

    tracing::debug!(input = tasks.len(), ranked = ranked.len(), "ranked tasks");
    ranked
}
