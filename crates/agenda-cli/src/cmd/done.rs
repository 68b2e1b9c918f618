//! `agenda done` / `agenda undo` — completion toggling.

use crate::output::{self, OutputMode};
use agenda_core::config::load_project_config;
use agenda_live::service;
use agenda_core::Task;
use anyhow::bail;
use chrono::{NaiveDate, TimeZone};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Task id.
    pub id: String,

    /// Occurrence date for a recurring task, YYYY-MM-DD. Defaults to today.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct UndoArgs {
    /// Task id.
    pub id: String,

    /// Occurrence date, YYYY-MM-DD. Defaults to today.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

pub fn run_done(
    args: &DoneArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let tz = super::timezone(&config)?;
    let date = super::resolve_date(args.date, tz);

    let path = crate::snapshot::store_path(project_root, &config);
    let mut store = crate::snapshot::load(&path)?;

    let Some(is_recurring) = store.task(&args.id).map(Task::is_recurring) else {
        return Err(agenda_live::StoreError::NotFound {
            entity: "task",
            id: args.id.clone(),
        }
        .into());
    };

    if is_recurring {
        let Some(instant) = date
            .and_hms_opt(12, 0, 0)
            .and_then(|noon| super::offset_on(tz, date).from_local_datetime(&noon).single())
        else {
            bail!("Could not resolve '{date}' in the configured timezone");
        };
        let record = service::complete_instance(&mut store, &args.id, owner, instant)?;
        crate::snapshot::save(&path, &store)?;
        output::render_message(
            output,
            &format!("Completed {} on {}", args.id, record.completed_date),
        )
    } else {
        let task = service::complete_task(&mut store, &args.id)?;
        crate::snapshot::save(&path, &store)?;
        output::render_task(output, &task)
    }
}

pub fn run_undo(args: &UndoArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let tz = super::timezone(&config)?;
    let date = super::resolve_date(args.date, tz);

    let path = crate::snapshot::store_path(project_root, &config);
    let mut store = crate::snapshot::load(&path)?;
    let Some(instant) = date
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| super::offset_on(tz, date).from_local_datetime(&noon).single())
    else {
        bail!("Could not resolve '{date}' in the configured timezone");
    };
    service::uncomplete_instance(&mut store, &args.id, instant)?;
    crate::snapshot::save(&path, &store)?;
    output::render_message(output, &format!("Reopened {} on {date}", args.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::add::{AddArgs, run_add};
    use agenda_live::CompletionStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    #[test]
    fn done_and_undo_toggle_a_recurring_occurrence() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_add(
            &AddArgs {
                title: "stretch".to_string(),
                priority: None,
                due: Some("2024-03-04T07:00:00".to_string()),
                rule: Some("FREQ=DAILY".to_string()),
            },
            "local",
            OutputMode::Json,
            dir.path(),
        )
        .expect("add");

        let done = DoneArgs {
            id: "task-1".to_string(),
            date: Some(date(5)),
        };
        run_done(&done, "local", OutputMode::Json, dir.path()).expect("done");
        // Completing the same occurrence twice stays at one record.
        run_done(&done, "local", OutputMode::Json, dir.path()).expect("done again");

        let path = dir.path().join("agenda.json");
        let store = crate::snapshot::load(&path).expect("load");
        assert!(store.get_completion("task-1", date(5)).expect("get").is_some());
        assert_eq!(store.completion_count(), 1);

        run_undo(
            &UndoArgs {
                id: "task-1".to_string(),
                date: Some(date(5)),
            },
            OutputMode::Json,
            dir.path(),
        )
        .expect("undo");
        let store = crate::snapshot::load(&path).expect("load");
        assert!(store.get_completion("task-1", date(5)).expect("get").is_none());
    }

    #[test]
    fn done_on_a_missing_task_surfaces_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = DoneArgs {
            id: "ghost".to_string(),
            date: None,
        };
        let err = run_done(&args, "local", OutputMode::Json, dir.path()).expect_err("must fail");
        // The typed store error stays in the chain so the binary can map
        // it to its stable code.
        assert!(matches!(
            err.downcast_ref::<agenda_live::StoreError>(),
            Some(agenda_live::StoreError::NotFound { entity: "task", .. })
        ));
    }
}
