//! `agenda describe` — render a rule as a human phrase.

use crate::output::{self, OutputMode};
use agenda_core::Rule;
use agenda_core::config::load_project_config;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Rule text, e.g. "FREQ=WEEKLY;BYDAY=MO,WE,FR".
    pub rule: String,
}

pub fn run_describe(
    args: &DescribeArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let rule = Rule::parse(&args.rule)?;
    output::render_message(output, &rule.describe(config.display.resolved_locale()))
}
