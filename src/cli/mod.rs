//! CLI commands.

use crate::core::{NewTask, ParentRef, Task, TaskFilter, TaskStore, TimeRemaining};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tasktree", about = "Hierarchical task store", version)]
pub struct Cli {
    /// Path to the task database
    #[arg(long, global = true, default_value = "tasks.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task name
        name: String,
        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Attach as a child of this task
        #[arg(long)]
        parent: Option<i64>,
    },

    /// List tasks
    List {
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        /// Only incomplete tasks
        #[arg(long)]
        pending: bool,
        /// Only root tasks
        #[arg(long)]
        root: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task ID
        id: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a task subtree (all roots when no id is given)
    Tree {
        /// Task ID
        id: Option<i64>,
    },

    /// Edit a task
    Edit {
        /// Task ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date
        #[arg(long, conflicts_with = "due")]
        no_due: bool,
    },

    /// Mark a task complete
    Done {
        /// Task ID
        id: i64,
    },

    /// Mark a task incomplete again
    Reopen {
        /// Task ID
        id: i64,
    },

    /// List direct children of a task
    Children {
        /// Task ID
        id: i64,
    },

    /// List tasks sharing a task's parent
    Siblings {
        /// Task ID
        id: i64,
    },

    /// Mark every task complete
    CompleteAll,

    /// Delete every completed task
    ClearCompleted,
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut store = TaskStore::open(&cli.db)?;

    match cli.command {
        Commands::Add { name, due, parent } => {
            let due = due.map(|s| parse_due(&s)).transpose()?;
            let new = NewTask {
                name,
                due,
                ..NewTask::default()
            };
            let task = match parent {
                Some(parent_id) => store.add_child(parent_id, new)?,
                None => store.create(new)?,
            };
            println!("{}", task.id);
        }

        Commands::List {
            completed,
            pending,
            root,
            json,
        } => {
            let mut filter = TaskFilter::new();
            if completed {
                filter = filter.complete(true);
            }
            if pending {
                filter = filter.complete(false);
            }
            if root {
                filter = filter.parent(ParentRef::Root);
            }
            let tasks = store.find_all(&filter)?;
            print_tasks(&tasks, json)?;
        }

        Commands::Show { id, json } => {
            let task = store.get(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print_detail(&task);
            }
        }

        Commands::Tree { id } => match id {
            Some(id) => {
                let root = store.get(id)?;
                let descendants = store.descendants_of(id)?;
                print_tree(&[root], &descendants);
            }
            None => {
                let roots = store.find_all(&TaskFilter::new().parent(ParentRef::Root))?;
                let all = store.find_all(&TaskFilter::new())?;
                print_tree(&roots, &all);
            }
        },

        Commands::Edit {
            id,
            name,
            due,
            no_due,
        } => {
            let mut task = store.get(id)?;
            if let Some(name) = name {
                task = store.rename(id, &name)?;
            }
            if no_due {
                task = store.set_due(id, None)?;
            } else if let Some(due) = due {
                task = store.set_due(id, Some(parse_due(&due)?))?;
            }
            println!("{}", format_line(&task));
        }

        Commands::Done { id } => {
            let task = store.set_complete(id, true)?;
            println!("{}", format_line(&task));
        }

        Commands::Reopen { id } => {
            let task = store.set_complete(id, false)?;
            println!("{}", format_line(&task));
        }

        Commands::Children { id } => {
            let children = store.children_of(id)?;
            print_tasks(&children, false)?;
        }

        Commands::Siblings { id } => {
            let siblings = store.siblings_of(id)?;
            print_tasks(&siblings, false)?;
        }

        Commands::CompleteAll => {
            let affected = store.complete_all()?;
            println!("Marked {affected} task(s) complete");
        }

        Commands::ClearCompleted => {
            let affected = store.clear_completed()?;
            println!("Deleted {affected} completed task(s)");
        }
    }

    Ok(())
}

/// Parse a due date given as RFC 3339 or a bare date (midnight UTC).
fn parse_due(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(Error::InvalidDue(input.to_string()))
}

fn print_tasks(tasks: &[Task], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in tasks {
        println!("{}", format_line(task));
    }
    Ok(())
}

fn format_line(task: &Task) -> String {
    let mut line = format!("{} #{} {}", task.status_char(), task.id, task.name);
    if let Some(due) = task.due {
        line.push_str(&format!(" (due {})", due.format("%Y-%m-%d %H:%M")));
    }
    line
}

fn print_detail(task: &Task) {
    println!("#{} {}", task.id, task.name);
    println!("Complete: {}", if task.complete { "yes" } else { "no" });
    match task.due {
        Some(due) => println!("Due: {}", due.format("%Y-%m-%d %H:%M:%S %Z")),
        None => println!("Due: none"),
    }
    if let Some(parent_id) = task.parent_id {
        println!("Parent: #{parent_id}");
    }
    match task.time_remaining() {
        TimeRemaining::Unbounded => println!("Remaining: unbounded"),
        TimeRemaining::Finite(delta) if delta < TimeDelta::zero() => {
            println!("Remaining: none (due {} ago)", format_delta(-delta));
        }
        TimeRemaining::Finite(delta) => println!("Remaining: {}", format_delta(delta)),
    }
    println!("Overdue: {}", if task.is_overdue() { "yes" } else { "no" });
}

/// Print roots with their descendants indented below them.
fn print_tree(roots: &[Task], rest: &[Task]) {
    let mut children: HashMap<i64, Vec<&Task>> = HashMap::new();
    for task in rest {
        if let Some(parent_id) = task.parent_id {
            children.entry(parent_id).or_default().push(task);
        }
    }
    for root in roots {
        print_tree_node(root, &children, 0);
    }
}

fn print_tree_node(task: &Task, children: &HashMap<i64, Vec<&Task>>, depth: usize) {
    println!("{}{}", "  ".repeat(depth), format_line(task));
    if let Some(kids) = children.get(&task.id) {
        for kid in kids {
            print_tree_node(kid, children, depth + 1);
        }
    }
}

fn format_delta(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    let days = minutes / (60 * 24);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_due_rfc3339() {
        let parsed = parse_due("2026-03-01T12:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn parse_due_bare_date_is_midnight_utc() {
        let parsed = parse_due("2026-03-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_due_rejects_garbage() {
        assert!(matches!(parse_due("next tuesday"), Err(Error::InvalidDue(_))));
        assert!(matches!(parse_due(""), Err(Error::InvalidDue(_))));
    }

    #[test]
    fn format_delta_picks_coarsest_unit() {
        assert_eq!(format_delta(TimeDelta::days(2) + TimeDelta::hours(3)), "2d 3h");
        assert_eq!(
            format_delta(TimeDelta::hours(5) + TimeDelta::minutes(7)),
            "5h 7m"
        );
        assert_eq!(format_delta(TimeDelta::minutes(42)), "42m");
    }

    #[test]
    fn format_line_includes_due_date() {
        let task = Task {
            id: 3,
            name: "water plants".to_string(),
            complete: false,
            due: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
            parent_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let line = format_line(&task);
        assert!(line.contains("#3 water plants"));
        assert!(line.contains("due 2026-03-01 09:00"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["tasktree", "add", "buy milk", "--due", "2026-03-01"]);
        assert!(matches!(cli.command, Commands::Add { .. }));

        let cli = Cli::parse_from(["tasktree", "--db", "other.db", "clear-completed"]);
        assert_eq!(cli.db, PathBuf::from("other.db"));
        assert!(matches!(cli.command, Commands::ClearCompleted));
    }
}
