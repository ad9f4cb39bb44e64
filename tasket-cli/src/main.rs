use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tasket_core::{
    DailySelection, StateStore, StopReason, TaskList, TaskSource, parse_due_date, parse_velocity,
    rank_tasks, remaining_capacity, selected_effort,
};

mod config;
mod display;
mod logging;
mod prompt;
mod state;

use config::{default_config_path, init_config, load_config};
use display::{DayStatus, greeting, ranked_table, status_lines};
use prompt::{LinePrompt, ask_velocity};
use state::Session;

#[derive(Parser, Debug)]
#[command(
    name = "tasket",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKET_BUILD_SHA"), ")"),
    about = "Rank your backlog and pick today's tasks"
)]
struct Cli {
    /// Config file (default: ~/.tasket/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log target: off, stderr, stdout, or a file path
    #[arg(long, global = true, default_value = "stderr")]
    log: String,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task to the backlog
    Add {
        title: String,

        /// 1-5
        #[arg(short, long)]
        urgency: u8,

        /// 1-5
        #[arg(short, long)]
        importance: u8,

        /// 1 (low) - 3 (high)
        #[arg(short, long)]
        effort: u8,

        /// "YYYY-MM-DD HH:MM", "YYYY-MM-DD" (configured timezone) or RFC 3339
        #[arg(long)]
        due: Option<String>,
    },

    /// Show open tasks by relevance
    Rank {
        /// Limit number of tasks printed (default: 20)
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Print every open task
        #[arg(long)]
        all: bool,
    },

    /// Record today's velocity (0-3); prompts when omitted
    Velocity { value: Option<String> },

    /// Walk through suggestions until today's velocity is used up
    Suggest,

    /// Show today's velocity and selected tasks
    Status,

    /// Mark a task complete
    Complete { id: String },

    /// Drop a task from today's selection
    Reject { id: String },

    /// Set (or clear, with no argument) the name used in greetings
    Username { name: Option<String> },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file
    Init,

    /// Print the resolved configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log, cli.verbose)?;

    let config_path = match cli.config {
        Some(p) => p,
        None => default_config_path()?,
    };

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => init_config(&config_path),
            ConfigCommand::Show => show_config(&config_path),
        };
    }

    let cfg = load_config(&config_path)?;
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut session = Session::open(&cfg, &base, Utc::now())?;

    match cli.command {
        Command::Add {
            title,
            urgency,
            importance,
            effort,
            due,
        } => {
            let due = due
                .as_deref()
                .map(|d| parse_due_date(d, session.tz))
                .transpose()?;
            let task = session
                .tasks
                .add(&title, urgency, importance, effort, due, session.now)
                .with_context(|| format!("adding to {}", session.tasks.path().display()))?;
            println!("Task added! ({})", task.id);
        }

        Command::Rank { limit, all } => {
            let tasks = session.tasks.load()?;
            let mut ranked = rank_tasks(&tasks, session.now);
            if !all {
                ranked.truncate(limit);
            }
            if ranked.is_empty() {
                println!("No open tasks. Add one with `tasket add`.");
            } else {
                print!("{}", ranked_table(&ranked, session.tz));
            }
        }

        Command::Velocity { value } => {
            let velocity = match value {
                Some(v) => parse_velocity(&v)?,
                None => ask_velocity(&mut io::stdin().lock(), &mut io::stdout())?,
            };
            session.state.set_velocity(session.today, velocity)?;
            if velocity == 0 {
                println!("I know you're busy today. Let's try again tomorrow! :)");
            } else {
                println!("Velocity for {} set to {velocity}.", session.today);
            }
        }

        Command::Suggest => suggest(&mut session)?,

        Command::Status => status(&session)?,

        Command::Complete { id } => {
            let task = session.tasks.set_complete(&id, true, session.now)?;
            session
                .state
                .add_to_list(session.today, TaskList::Completed, &id)?;
            println!("Completed: {}", task.title);
        }

        Command::Reject { id } => {
            let removed = session
                .state
                .remove_from_list(session.today, TaskList::Selected, &id)?;
            session
                .state
                .add_to_list(session.today, TaskList::Rejected, &id)?;
            if removed {
                println!("Removed {id} from today's tasks.");
            } else {
                tracing::warn!(%id, "rejected task was not selected today");
                println!("{id} wasn't selected today; it won't be suggested again today.");
            }
        }

        Command::Username { name } => {
            session.state.set_username(name)?;
            println!("{}", greeting(session.state.username()?.as_deref()));
        }

        Command::Config { .. } => unreachable!("handled before opening stores"),
    }

    Ok(())
}

fn show_config(path: &Path) -> Result<()> {
    let cfg = load_config(path)?;
    let base = path.parent().unwrap_or(Path::new("."));
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    println!("# tasks file: {}", cfg.tasks_path(base).display());
    println!("# state file: {}", cfg.state_path(base).display());
    Ok(())
}

fn suggest(session: &mut Session) -> Result<()> {
    println!("{}\n", greeting(session.state.username()?.as_deref()));

    if session.state.velocity(session.today)?.is_none() {
        let velocity = ask_velocity(&mut io::stdin().lock(), &mut io::stdout())?;
        session.state.set_velocity(session.today, velocity)?;
    }

    let stdin = io::stdin();
    let mut prompt = LinePrompt::new(stdin.lock(), io::stdout());
    let outcome = DailySelection::new(&session.tasks, &mut session.state, session.policy)?
        .run(session.today, session.now, &mut prompt)?;

    if !outcome.accepted.is_empty() {
        let titles: HashMap<String, String> = session
            .tasks
            .load()?
            .into_iter()
            .map(|t| (t.id, t.title))
            .collect();
        println!("\nAdded to today:");
        for id in &outcome.accepted {
            println!("- {}", titles.get(id).map_or(id.as_str(), String::as_str));
        }
    }

    let msg = match outcome.stop {
        StopReason::AwaitingVelocity => "No velocity for today yet.",
        StopReason::CapacityExhausted if outcome.velocity == Some(0) => {
            "I know you're busy today. Let's try again tomorrow! :)"
        }
        StopReason::CapacityExhausted => "That fills up today. Nice!",
        StopReason::NoCandidates => "No more suggestions fit what's left of today.",
        StopReason::Cancelled => "Okay, stopping here.",
    };
    println!("\n{msg}");
    Ok(())
}

fn status(session: &Session) -> Result<()> {
    println!("{}\n", greeting(session.state.username()?.as_deref()));

    let tasks = session.tasks.load()?;
    let selected_ids = session.state.list(session.today, TaskList::Selected)?;
    let by_id: HashMap<&str, &tasket_core::Task> =
        tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let day = DayStatus {
        velocity: session.state.velocity(session.today)?,
        selected: selected_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|t| (*t).clone()))
            .collect(),
        completed_ids: session.state.list(session.today, TaskList::Completed)?,
        selected_effort: selected_effort(&tasks, &session.state, session.today)?,
        remaining: remaining_capacity(&tasks, &session.state, session.today)?.unwrap_or(0),
    };

    for line in status_lines(&day) {
        println!("{line}");
    }
    Ok(())
}
