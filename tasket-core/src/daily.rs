//! Daily selection loop: fills today's capacity from ranked suggestions.
//!
//! States: `AwaitingVelocity → HasCapacity → (Offering → HasCapacity)* → Done`.
//!
//! Each round:
//! 1) pick the effort tier matching remaining capacity
//! 2) ask the selector for candidates, excluding today's selected and rejected
//!    tasks plus anything declined earlier in this run
//! 3) record the offered IDs as suggested, then hand them to the prompt
//! 4) on accept: record the ID as selected and charge its effort
//!
//! The loop stops when capacity is used up, the selector has nothing left, or the
//! prompt cancels. It never removes anything from the selected list.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::backlog::{EffortTier, RankedBacklog};
use crate::error::{Result, TasketError};
use crate::interleave::InterleaveOptions;
use crate::rank::{RankedTask, rank_tasks};
use crate::selector::SuggestionSelector;
use crate::store::{StateStore, TaskList, TaskSource, selected_effort};

pub const DEFAULT_OFFER_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingVelocity,
    HasCapacity,
    Offering,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No velocity recorded for the day yet.
    AwaitingVelocity,
    CapacityExhausted,
    NoCandidates,
    Cancelled,
}

/// What the caller decided about one offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept(String),
    Decline(String),
    Cancel,
}

/// One round of suggestions.
#[derive(Debug, Clone)]
pub struct Offer {
    pub tier: EffortTier,
    pub remaining: i32,
    pub candidates: Vec<RankedTask>,
}

impl Offer {
    pub fn contains(&self, id: &str) -> bool {
        self.candidates.iter().any(|c| c.id() == id)
    }
}

/// Presents offers and reports the decision (stdin in the CLI, scripted in tests).
pub trait SuggestionPrompt {
    fn choose(&mut self, offer: &Offer) -> Result<Decision>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub velocity: Option<u8>,
    pub accepted: Vec<String>,
    pub declined: Vec<String>,
    pub remaining: i32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub interleave: InterleaveOptions,
    /// Max candidates per offer; `None` offers the whole selector output.
    pub offer_limit: Option<usize>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            interleave: InterleaveOptions::default(),
            offer_limit: Some(DEFAULT_OFFER_LIMIT),
        }
    }
}

/// Capacity left on `date`, or `None` before a velocity is recorded.
pub fn remaining_capacity<S, T>(tasks: &S, state: &T, date: NaiveDate) -> Result<Option<i32>>
where
    S: TaskSource + ?Sized,
    T: StateStore + ?Sized,
{
    let Some(velocity) = state.velocity(date)? else {
        return Ok(None);
    };
    Ok(Some(i32::from(velocity) - selected_effort(tasks, state, date)?))
}

pub struct DailySelection<'a, S: TaskSource, T: StateStore> {
    tasks: &'a S,
    state: &'a mut T,
    selector: SuggestionSelector,
    offer_limit: Option<usize>,
    phase: LoopState,
}

impl<'a, S: TaskSource, T: StateStore> DailySelection<'a, S, T> {
    pub fn new(tasks: &'a S, state: &'a mut T, policy: SelectionPolicy) -> Result<Self> {
        Ok(Self {
            tasks,
            state,
            selector: SuggestionSelector::with_options(policy.interleave)?,
            offer_limit: policy.offer_limit,
            phase: LoopState::AwaitingVelocity,
        })
    }

    pub fn phase(&self) -> LoopState {
        self.phase
    }

    fn enter(&mut self, next: LoopState) {
        tracing::trace!(from = ?self.phase, to = ?next, "daily selection transition");
        self.phase = next;
    }

    /// Run suggestion rounds for `date`, scoring against `now`.
    pub fn run<P: SuggestionPrompt + ?Sized>(
        &mut self,
        date: NaiveDate,
        now: DateTime<Utc>,
        prompt: &mut P,
    ) -> Result<SelectionOutcome> {
        self.phase = LoopState::AwaitingVelocity;

        let Some(velocity) = self.state.velocity(date)? else {
            tracing::info!(%date, "no velocity recorded; nothing to suggest");
            self.enter(LoopState::Done);
            return Ok(SelectionOutcome {
                velocity: None,
                accepted: vec![],
                declined: vec![],
                remaining: 0,
                stop: StopReason::AwaitingVelocity,
            });
        };

        let mut remaining = i32::from(velocity) - selected_effort(self.tasks, &*self.state, date)?;
        self.enter(LoopState::HasCapacity);

        let backlog = RankedBacklog::new(rank_tasks(&self.tasks.load()?, now));
        let mut accepted = Vec::new();
        let mut declined: Vec<String> = Vec::new();

        let stop = loop {
            let Some(tier) = EffortTier::for_capacity(remaining) else {
                break StopReason::CapacityExhausted;
            };

            let mut exclude: HashSet<String> = declined.iter().cloned().collect();
            exclude.extend(self.state.list(date, TaskList::Selected)?);
            exclude.extend(self.state.list(date, TaskList::Rejected)?);

            let mut ids = self.selector.select(&backlog, &exclude, tier)?;
            if let Some(limit) = self.offer_limit {
                ids.truncate(limit);
            }
            if ids.is_empty() {
                break StopReason::NoCandidates;
            }

            self.enter(LoopState::Offering);
            for id in &ids {
                self.state.add_to_list(date, TaskList::Suggested, id)?;
            }

            let offer = Offer {
                tier,
                remaining,
                candidates: ids.iter().filter_map(|id| backlog.get(id).cloned()).collect(),
            };

            match prompt.choose(&offer)? {
                Decision::Accept(id) => {
                    if !offer.contains(&id) {
                        return Err(TasketError::validation(
                            "task id",
                            format!("'{id}' was not among the offered suggestions"),
                        ));
                    }
                    self.state.add_to_list(date, TaskList::Selected, &id)?;
                    let effort = backlog.get(&id).map_or(0, RankedTask::effort);
                    remaining -= i32::from(effort);
                    tracing::info!(%id, effort, remaining, "suggestion accepted");
                    accepted.push(id);
                }
                Decision::Decline(id) => {
                    if !offer.contains(&id) {
                        return Err(TasketError::validation(
                            "task id",
                            format!("'{id}' was not among the offered suggestions"),
                        ));
                    }
                    tracing::debug!(%id, "suggestion declined");
                    declined.push(id);
                }
                Decision::Cancel => break StopReason::Cancelled,
            }
            self.enter(LoopState::HasCapacity);
        };

        self.enter(LoopState::Done);
        tracing::info!(%date, ?stop, accepted = accepted.len(), remaining, "daily selection finished");

        Ok(SelectionOutcome {
            velocity: Some(velocity),
            accepted,
            declined,
            remaining,
            stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UserState;
    use crate::task::Task;
    use chrono::TimeZone;

    struct Script(Vec<Decision>);

    impl SuggestionPrompt for Script {
        fn choose(&mut self, _offer: &Offer) -> Result<Decision> {
            if self.0.is_empty() {
                return Ok(Decision::Cancel);
            }
            Ok(self.0.remove(0))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("m1", "medium").with_effort(2).with_importance(5),
            Task::new("l1", "low").with_effort(1).with_importance(4),
            Task::new("l2", "low too").with_effort(1).with_importance(2),
        ]
    }

    #[test]
    fn without_velocity_awaits() {
        let tasks = tasks();
        let mut state = UserState::new();
        let mut run = DailySelection::new(&tasks, &mut state, SelectionPolicy::default()).unwrap();
        let out = run.run(date(), now(), &mut Script(vec![])).unwrap();
        assert_eq!(out.stop, StopReason::AwaitingVelocity);
        assert_eq!(run.phase(), LoopState::Done);
    }

    #[test]
    fn zero_velocity_is_exhausted_immediately() {
        let tasks = tasks();
        let mut state = UserState::new();
        state.set_velocity(date(), 0).unwrap();
        let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
            .unwrap()
            .run(date(), now(), &mut Script(vec![]))
            .unwrap();
        assert_eq!(out.stop, StopReason::CapacityExhausted);
        assert!(state.list(date(), TaskList::Suggested).unwrap().is_empty());
    }

    #[test]
    fn accepts_until_capacity_runs_out() {
        let tasks = tasks();
        let mut state = UserState::new();
        state.set_velocity(date(), 3).unwrap();
        let script = Script(vec![Decision::Accept("m1".into()), Decision::Accept("l1".into())]);
        let mut prompt = script;
        let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
            .unwrap()
            .run(date(), now(), &mut prompt)
            .unwrap();
        assert_eq!(out.accepted, vec!["m1", "l1"]);
        assert_eq!(out.remaining, 0);
        assert_eq!(out.stop, StopReason::CapacityExhausted);
        assert_eq!(state.list(date(), TaskList::Selected).unwrap(), vec!["m1", "l1"]);
    }

    #[test]
    fn decline_moves_on_and_cancel_stops() {
        let tasks = tasks();
        let mut state = UserState::new();
        state.set_velocity(date(), 1).unwrap();
        let mut prompt = Script(vec![Decision::Decline("l1".into()), Decision::Cancel]);
        let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
            .unwrap()
            .run(date(), now(), &mut prompt)
            .unwrap();
        assert_eq!(out.declined, vec!["l1"]);
        assert_eq!(out.stop, StopReason::Cancelled);
        assert_eq!(out.remaining, 1);
        assert!(state.list(date(), TaskList::Selected).unwrap().is_empty());
        assert_eq!(state.list(date(), TaskList::Suggested).unwrap(), vec!["l1", "l2"]);
    }

    #[test]
    fn accepting_unoffered_id_is_rejected() {
        let tasks = tasks();
        let mut state = UserState::new();
        state.set_velocity(date(), 1).unwrap();
        let mut prompt = Script(vec![Decision::Accept("m1".into())]);
        let err = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
            .unwrap()
            .run(date(), now(), &mut prompt)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn remaining_capacity_subtracts_selected_effort() {
        let tasks = tasks();
        let mut state = UserState::new();
        assert_eq!(remaining_capacity(&tasks, &state, date()).unwrap(), None);
        state.set_velocity(date(), 3).unwrap();
        state.add_to_list(date(), TaskList::Selected, "m1").unwrap();
        state.add_to_list(date(), TaskList::Selected, "ghost").unwrap();
        assert_eq!(remaining_capacity(&tasks, &state, date()).unwrap(), Some(1));
    }
}
