use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tasket_core::{
    DailySelection, Decision, EffortTier, Offer, SelectionPolicy, StateStore, StopReason,
    SuggestionPrompt, Task, TaskList, UserState, remaining_capacity,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Backlog with every effort tier, a finished task, and a few due dates.
fn backlog() -> Vec<Task> {
    vec![
        Task::new("report", "Quarterly report").with_effort(3).with_urgency(4).with_importance(5),
        Task::new("taxes", "File taxes")
            .with_effort(2)
            .with_urgency(2)
            .with_importance(3)
            .with_due_date(now() - Duration::days(3)),
        Task::new("email", "Answer email").with_effort(1).with_urgency(5).with_importance(2),
        Task::new("plants", "Water plants").with_effort(1).with_urgency(1).with_importance(1),
        Task::new("dentist", "Book dentist")
            .with_effort(1)
            .with_urgency(2)
            .with_importance(4)
            .with_due_date(now() + Duration::days(2)),
        Task::new("garage", "Clean garage").with_effort(3).with_urgency(1).with_importance(2),
        Task::new("done", "Already done").with_effort(1).with_importance(5).completed(),
    ]
}

/// Accepts the first candidate of every offer and records what it saw.
#[derive(Default)]
struct TakeFirst {
    seen: Vec<(EffortTier, Vec<String>)>,
}

impl SuggestionPrompt for TakeFirst {
    fn choose(&mut self, offer: &Offer) -> tasket_core::Result<Decision> {
        let ids: Vec<String> = offer.candidates.iter().map(|c| c.task.id.clone()).collect();
        self.seen.push((offer.tier, ids.clone()));
        Ok(Decision::Accept(ids[0].clone()))
    }
}

#[test]
fn fills_full_velocity_from_top_suggestions() {
    let tasks = backlog();
    let mut state = UserState::new();
    state.set_velocity(today(), 3).unwrap();

    let mut prompt = TakeFirst::default();
    let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
        .unwrap()
        .run(today(), now(), &mut prompt)
        .unwrap();

    // tier 3 offer leads with the best high-effort task
    assert_eq!(prompt.seen[0].0, EffortTier::High);
    assert_eq!(prompt.seen[0].1[0], "report");
    assert_eq!(out.accepted, vec!["report"]);
    assert_eq!(out.stop, StopReason::CapacityExhausted);
    assert_eq!(out.remaining, 0);
    assert!(prompt.seen.iter().flat_map(|(_, ids)| ids).all(|id| id != "done"));
}

#[test]
fn second_run_resumes_from_remaining_capacity() {
    let tasks = backlog();
    let mut state = UserState::new();
    state.set_velocity(today(), 3).unwrap();
    state.add_to_list(today(), TaskList::Selected, "taxes").unwrap();

    assert_eq!(remaining_capacity(&tasks, &state, today()).unwrap(), Some(1));

    let mut prompt = TakeFirst::default();
    let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
        .unwrap()
        .run(today(), now(), &mut prompt)
        .unwrap();

    assert_eq!(prompt.seen.len(), 1);
    assert_eq!(prompt.seen[0].0, EffortTier::Low);
    // dentist: 4.8 * 1.25 beats email: 3 + 5/5
    assert_eq!(prompt.seen[0].1, vec!["dentist", "email", "plants"]);
    assert_eq!(out.accepted, vec!["dentist"]);
    assert_eq!(
        state.list(today(), TaskList::Selected).unwrap(),
        vec!["taxes", "dentist"]
    );
}

#[test]
fn rejected_tasks_are_not_offered_again() {
    let tasks = backlog();
    let mut state = UserState::new();
    state.set_velocity(today(), 1).unwrap();
    state.add_to_list(today(), TaskList::Rejected, "dentist").unwrap();

    let mut prompt = TakeFirst::default();
    DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
        .unwrap()
        .run(today(), now(), &mut prompt)
        .unwrap();

    assert_eq!(prompt.seen[0].1, vec!["email", "plants"]);
}

#[test]
fn suggested_ids_are_recorded_once() {
    let tasks = backlog();
    let mut state = UserState::new();
    state.set_velocity(today(), 2).unwrap();

    struct DeclineAll;
    impl SuggestionPrompt for DeclineAll {
        fn choose(&mut self, offer: &Offer) -> tasket_core::Result<Decision> {
            Ok(Decision::Decline(offer.candidates[0].task.id.clone()))
        }
    }

    let out = DailySelection::new(&tasks, &mut state, SelectionPolicy::default())
        .unwrap()
        .run(today(), now(), &mut DeclineAll)
        .unwrap();

    assert_eq!(out.stop, StopReason::NoCandidates);
    assert!(out.accepted.is_empty());

    let suggested = state.list(today(), TaskList::Suggested).unwrap();
    let mut unique = suggested.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), suggested.len());
    // tier 2 blend covers every open medium and low task
    assert_eq!(suggested.len(), 4);
    assert_eq!(out.declined.len(), 4);
}

#[test]
fn offer_limit_bounds_each_round() {
    let tasks = backlog();
    let mut state = UserState::new();
    state.set_velocity(today(), 3).unwrap();

    let policy = SelectionPolicy {
        offer_limit: Some(2),
        ..SelectionPolicy::default()
    };
    let mut prompt = TakeFirst::default();
    DailySelection::new(&tasks, &mut state, policy)
        .unwrap()
        .run(today(), now(), &mut prompt)
        .unwrap();

    assert!(prompt.seen.iter().all(|(_, ids)| ids.len() <= 2));
    assert_eq!(state.list(today(), TaskList::Suggested).unwrap().len(), 2);
}
