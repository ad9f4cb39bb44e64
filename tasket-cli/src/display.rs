use chrono_tz::Tz;
use tasket_core::{NO_DUE_DATE_DAYS, RankedTask, Task};

pub fn greeting(username: Option<&str>) -> String {
    match username {
        Some(name) => format!("Hello, {name}!"),
        None => "Hello!".to_string(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Ranked table, one row per task.
pub fn ranked_table(ranked: &[RankedTask], tz: Tz) -> String {
    let mut s = format!(
        "{:<5} {:<32} {:>3} {:>3} {:>3}  {:<16} {:>5} {:>5} {:>5} {:>6}\n",
        "Rank", "Task", "Urg", "Imp", "Eff", "Due", "Days", "Mult", "Base", "Score"
    );
    s.push_str(&"-".repeat(97));
    s.push('\n');

    for r in ranked {
        let due = r
            .task
            .due_date
            .map(|d| d.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "--".to_string());
        let days = if r.relevance.days_until_due == NO_DUE_DATE_DAYS {
            "--".to_string()
        } else {
            r.relevance.days_until_due.to_string()
        };
        s.push_str(&format!(
            "#{:03}  {:<32} {:>3} {:>3} {:>3}  {:<16} {:>5} {:>5.2} {:>5.2} {:>6.2}\n",
            r.rank,
            truncate(&r.task.title, 32),
            r.task.urgency,
            r.task.importance,
            r.task.effort,
            due,
            days,
            r.relevance.due_date_multiplier,
            r.relevance.combined_relevance,
            r.relevance.relevance_score,
        ));
    }
    s
}

/// What today looks like.
#[derive(Debug, Clone, Default)]
pub struct DayStatus {
    pub velocity: Option<u8>,
    /// Today's selected tasks, resolved against the task store.
    pub selected: Vec<Task>,
    pub completed_ids: Vec<String>,
    pub selected_effort: i32,
    /// Velocity minus selected effort.
    pub remaining: i32,
}

pub fn status_lines(day: &DayStatus) -> Vec<String> {
    let mut lines = Vec::new();

    match day.velocity {
        None => {
            lines.push("You haven't entered your velocity for today yet.".to_string());
            lines.push(
                "Let us know how much you feel you can do today with `tasket velocity <0-3>`."
                    .to_string(),
            );
        }
        Some(0) => lines.push("I know you're busy today. Let's try again tomorrow! :)".to_string()),
        Some(_) if day.selected.is_empty() => lines.push(
            "You haven't selected any tasks for today. Run `tasket suggest` to get started."
                .to_string(),
        ),
        Some(_) => {}
    }

    if let Some(velocity) = day.velocity.filter(|v| *v > 0) {
        if !day.selected.is_empty() {
            lines.push("Here are your tasks for today:".to_string());
            for t in &day.selected {
                let mark = if day.completed_ids.contains(&t.id) { "x" } else { " " };
                lines.push(format!("- [{mark}] {}", t.title));
            }
        }
        if day.selected_effort > 0 && day.selected_effort < i32::from(velocity) {
            lines.push(format!(
                "You still have room to cross more off your list today ({} effort left of {velocity})! Run `tasket suggest` to pick another task.",
                day.remaining
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_without_velocity() {
        let lines = status_lines(&DayStatus::default());
        assert!(lines[0].contains("haven't entered your velocity"));
    }

    #[test]
    fn status_busy_day() {
        let day = DayStatus {
            velocity: Some(0),
            ..Default::default()
        };
        assert_eq!(status_lines(&day), vec!["I know you're busy today. Let's try again tomorrow! :)"]);
    }

    #[test]
    fn status_lists_selected_and_room_left() {
        let day = DayStatus {
            velocity: Some(3),
            selected: vec![Task::new("a", "Pay rent"), Task::new("b", "Call mom")],
            completed_ids: vec!["b".to_string()],
            selected_effort: 2,
            remaining: 1,
        };
        let lines = status_lines(&day);
        assert_eq!(lines[0], "Here are your tasks for today:");
        assert_eq!(lines[1], "- [ ] Pay rent");
        assert_eq!(lines[2], "- [x] Call mom");
        assert!(lines[3].contains("still have room"));
        assert!(lines[3].contains("1 effort left of 3"));
    }

    #[test]
    fn status_nothing_selected() {
        let day = DayStatus {
            velocity: Some(2),
            ..Default::default()
        };
        let lines = status_lines(&day);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("tasket suggest"));
    }

    #[test]
    fn greeting_uses_name() {
        assert_eq!(greeting(Some("Lacie")), "Hello, Lacie!");
        assert_eq!(greeting(None), "Hello!");
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
