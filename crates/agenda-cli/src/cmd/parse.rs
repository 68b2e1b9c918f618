//! `agenda parse` — create a task from an extraction response.

use crate::output::{self, OutputMode};
use agenda_core::config::load_project_config;
use agenda_live::{TaskDraft, service};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// The extractor's raw response text; prose around the JSON object is
    /// tolerated.
    pub response: String,

    /// Validate and print without creating the task.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run_parse(
    args: &ParseArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let tz = super::timezone(&config)?;
    let parsed = agenda_nlp::parse_response(&args.response, tz)?;

    if args.dry_run {
        return output::render_message(
            output,
            &format!(
                "{} (priority: {}, due: {}, rule: {})",
                parsed.title,
                parsed.priority.map_or("none".to_string(), |p| p.to_string()),
                parsed
                    .due_date
                    .map_or("none".to_string(), |d| d.to_rfc3339()),
                parsed.recurrence_rule.as_deref().unwrap_or("none"),
            ),
        );
    }

    let path = crate::snapshot::store_path(project_root, &config);
    let mut store = crate::snapshot::load(&path)?;
    let task = service::create_task(
        &mut store,
        owner,
        TaskDraft {
            title: parsed.title,
            priority: parsed.priority,
            due_date: parsed.due_date,
            recurrence_rule: parsed.recurrence_rule,
        },
    )?;
    crate::snapshot::save(&path, &store)?;
    output::render_task(output, &task)
}
