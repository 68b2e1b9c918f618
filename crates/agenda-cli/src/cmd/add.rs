//! `agenda add` — create a task.

use crate::output::{self, OutputMode};
use agenda_core::Priority;
use agenda_core::config::load_project_config;
use agenda_live::{TaskDraft, service};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title.
    pub title: String,

    /// Priority: 1 (high), 2 (medium), or 3 (low).
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Due date-time in the configured timezone, YYYY-MM-DD[THH:MM:SS].
    #[arg(short, long)]
    pub due: Option<String>,

    /// Recurrence rule, e.g. "FREQ=WEEKLY;BYDAY=MO,FR".
    #[arg(short, long)]
    pub rule: Option<String>,
}

pub fn run_add(
    args: &AddArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let tz = super::timezone(&config)?;

    let due_date = args
        .due
        .as_deref()
        .map(|text| super::parse_due(text, tz))
        .transpose()?;
    let recurrence_rule = args
        .rule
        .as_deref()
        .map(super::validate_rule)
        .transpose()?;

    let path = crate::snapshot::store_path(project_root, &config);
    let mut store = crate::snapshot::load(&path)?;
    let task = service::create_task(
        &mut store,
        owner,
        TaskDraft {
            title: args.title.clone(),
            priority: args.priority,
            due_date,
            recurrence_rule,
        },
    )?;
    crate::snapshot::save(&path, &store)?;

    output::render_task(output, &task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_args_parse_priority_names_and_numbers() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let w = Wrapper::parse_from(["test", "pay rent", "--priority", "high"]);
        assert_eq!(w.args.priority, Some(Priority::High));
        let w = Wrapper::parse_from(["test", "pay rent", "-p", "2"]);
        assert_eq!(w.args.priority, Some(Priority::Medium));
    }

    #[test]
    fn add_creates_and_persists_the_task() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = AddArgs {
            title: "water plants".to_string(),
            priority: None,
            due: None,
            rule: Some("FREQ=DAILY;INTERVAL=3".to_string()),
        };
        run_add(&args, "local", OutputMode::Json, dir.path()).expect("add");

        let store = crate::snapshot::load(&dir.path().join("agenda.json")).expect("load");
        let tasks = agenda_live::TaskStore::list_scheduled_tasks(&store, "local").expect("list");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].recurrence_rule.as_deref(), Some("FREQ=DAILY;INTERVAL=3"));
    }

    #[test]
    fn add_rejects_a_malformed_rule() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = AddArgs {
            title: "x".to_string(),
            priority: None,
            due: None,
            rule: Some("FREQ=SOMETIMES".to_string()),
        };
        assert!(run_add(&args, "local", OutputMode::Json, dir.path()).is_err());
    }
}
