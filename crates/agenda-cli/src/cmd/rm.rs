//! `agenda rm` — delete a task.

use crate::output::{self, OutputMode};
use agenda_core::config::load_project_config;
use agenda_live::service;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Task id.
    pub id: String,
}

pub fn run_rm(args: &RmArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let path = crate::snapshot::store_path(project_root, &config);
    let mut store = crate::snapshot::load(&path)?;
    service::delete_task(&mut store, &args.id)?;
    crate::snapshot::save(&path, &store)?;
    output::render_message(output, &format!("Deleted {}", args.id))
}
