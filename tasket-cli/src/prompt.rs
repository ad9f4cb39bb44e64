use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};
use tasket_core::{Decision, Offer, SuggestionPrompt, TasketError, parse_velocity};

fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

/// Ask until a valid velocity (0..=3) is entered. EOF aborts.
pub fn ask_velocity<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<u8> {
    loop {
        let Some(answer) = read_line(input, out, "How much can you take on today? (0-3): ")? else {
            bail!("no velocity entered");
        };
        match parse_velocity(&answer) {
            Ok(v) => return Ok(v),
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

/// Interactive offer prompt.
///
/// Input: `<n>` accepts suggestion n, `s <n>` skips it, `q` or blank quits.
pub struct LinePrompt<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    fn render(&mut self, offer: &Offer) -> io::Result<()> {
        writeln!(
            self.out,
            "\nCapacity left: {} (showing {} effort and below)",
            offer.remaining, offer.tier
        )?;
        for (i, c) in offer.candidates.iter().enumerate() {
            writeln!(
                self.out,
                "  {:>2}. {} [effort {}, score {:.2}]",
                i + 1,
                c.task.title,
                c.effort(),
                c.score()
            )?;
        }
        Ok(())
    }
}

fn parse_answer(answer: &str, offer: &Offer) -> Option<Decision> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
        return Some(Decision::Cancel);
    }
    let (skip, num) = match answer.strip_prefix(['s', 'S']) {
        Some(rest) => (true, rest.trim()),
        None => (false, answer),
    };
    let n: usize = num.parse().ok()?;
    let id = offer.candidates.get(n.checked_sub(1)?)?.task.id.clone();
    Some(if skip { Decision::Decline(id) } else { Decision::Accept(id) })
}

impl<R: BufRead, W: Write> SuggestionPrompt for LinePrompt<R, W> {
    fn choose(&mut self, offer: &Offer) -> tasket_core::Result<Decision> {
        self.render(offer).map_err(TasketError::storage)?;
        loop {
            let line = read_line(
                &mut self.input,
                &mut self.out,
                "Pick a number to add it, 's <n>' to skip, 'q' to stop: ",
            )
            .map_err(TasketError::storage)?;
            let Some(line) = line else {
                return Ok(Decision::Cancel);
            };
            match parse_answer(&line, offer) {
                Some(d) => return Ok(d),
                None => writeln!(self.out, "Didn't catch that.").map_err(TasketError::storage)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tasket_core::{EffortTier, Task, rank_tasks};

    fn offer() -> Offer {
        let tasks = vec![
            Task::new("a", "First").with_importance(5),
            Task::new("b", "Second"),
        ];
        Offer {
            tier: EffortTier::Low,
            remaining: 1,
            candidates: rank_tasks(&tasks, chrono::Utc::now()),
        }
    }

    #[test]
    fn answers_map_to_decisions() {
        let o = offer();
        assert_eq!(parse_answer("1", &o), Some(Decision::Accept("a".into())));
        assert_eq!(parse_answer("s 2", &o), Some(Decision::Decline("b".into())));
        assert_eq!(parse_answer("S2", &o), Some(Decision::Decline("b".into())));
        assert_eq!(parse_answer("q", &o), Some(Decision::Cancel));
        assert_eq!(parse_answer("", &o), Some(Decision::Cancel));
        assert_eq!(parse_answer("3", &o), None);
        assert_eq!(parse_answer("0", &o), None);
        assert_eq!(parse_answer("yes", &o), None);
    }

    #[test]
    fn prompt_retries_on_bad_input() {
        let mut p = LinePrompt::new(Cursor::new("nope\n2\n"), Vec::new());
        let d = p.choose(&offer()).unwrap();
        assert_eq!(d, Decision::Accept("b".into()));
        let shown = String::from_utf8(p.out).unwrap();
        assert!(shown.contains(" 1. First"));
        assert!(shown.contains("Didn't catch that."));
    }

    #[test]
    fn eof_cancels() {
        let mut p = LinePrompt::new(Cursor::new(""), Vec::new());
        assert_eq!(p.choose(&offer()).unwrap(), Decision::Cancel);
    }

    #[test]
    fn velocity_prompt_loops_until_valid() {
        let mut out = Vec::new();
        let v = ask_velocity(&mut Cursor::new("9\ntwo\n2\n"), &mut out).unwrap();
        assert_eq!(v, 2);
        assert!(ask_velocity(&mut Cursor::new(""), &mut Vec::new()).is_err());
    }
}
