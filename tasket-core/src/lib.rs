//! tasket-core: relevance scoring, ranking, and daily suggestion selection

pub mod backlog;
pub mod daily;
pub mod error;
pub mod interleave;
pub mod rank;
pub mod score;
pub mod selector;
pub mod state;
pub mod store;
pub mod task;
pub mod time;

pub use backlog::{EffortTier, RankedBacklog};
pub use daily::{
    DailySelection, Decision, LoopState, Offer, SelectionOutcome, SelectionPolicy, StopReason,
    SuggestionPrompt, remaining_capacity,
};
pub use error::{Result, TasketError};
pub use interleave::{InterleaveOptions, interleave, interleave_with};
pub use rank::{RankedTask, rank_tasks};
pub use score::{NO_DUE_DATE_DAYS, Relevance, combine_relevance, days_until_due, due_date_multiplier};
pub use selector::SuggestionSelector;
pub use state::UserState;
pub use store::{StateStore, TaskList, TaskSource, parse_velocity, selected_effort, validate_velocity};
pub use task::Task;
pub use time::{parse_due_date, parse_timezone, today_in};
