//! `agenda day|week|month|year` — expand a view window and print it.

use crate::output::{self, OutputMode};
use agenda_core::Window;
use agenda_core::config::load_project_config;
use agenda_live::service;
use chrono::NaiveDate;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Date inside the window, YYYY-MM-DD. Defaults to today.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Include completed instances.
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct MonthArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Pad to whole weeks, the way a month grid renders.
    #[arg(long)]
    pub grid: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum Span {
    Day,
    Week,
    Year,
}

pub fn run_view(
    span: Span,
    args: &ViewArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let window = |date, tz| match span {
        Span::Day => Window::day(date, tz),
        Span::Week => Window::week(date, tz),
        Span::Year => Window::year(date, tz),
    };
    expand_and_render(window, args, owner, output, project_root)
}

pub fn run_month(
    args: &MonthArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let window = |date, tz| {
        if args.grid {
            Window::month_display(date, tz)
        } else {
            Window::month(date, tz)
        }
    };
    expand_and_render(window, &args.view, owner, output, project_root)
}

fn expand_and_render(
    window: impl FnOnce(NaiveDate, chrono::FixedOffset) -> Window,
    args: &ViewArgs,
    owner: &str,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = load_project_config(project_root)?;
    let tz = super::timezone(&config)?;
    let date = super::resolve_date(args.date, tz);
    let window = window(date, super::offset_on(tz, date));

    let hide_completed = !args.all && config.display.hide_completed;
    let store = crate::snapshot::load(&crate::snapshot::store_path(project_root, &config))?;
    let instances = service::instances_in_window(&store, owner, &window, hide_completed)?;
    output::render_instances(output, &instances)
}
