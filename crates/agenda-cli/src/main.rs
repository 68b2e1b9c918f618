#![forbid(unsafe_code)]

mod cmd;
mod output;
mod snapshot;

use agenda_core::{ErrorCode, RuleParseError};
use agenda_live::StoreError;
use agenda_nlp::ExtractionError;
use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "agenda: recurring task manager",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Owner whose tasks to operate on.
    #[arg(long, global = true, default_value = "local")]
    owner: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Create a task",
        after_help = "EXAMPLES:\n    # A one-off task\n    agenda add \"pay rent\" --due 2026-09-01T09:00:00 --priority 1\n\n    # A recurring habit\n    agenda add \"water plants\" --rule \"FREQ=DAILY;INTERVAL=3\""
    )]
    Add(cmd::add::AddArgs),

    #[command(
        about = "Show the expanded view for a day",
        after_help = "EXAMPLES:\n    # Today\n    agenda day\n\n    # A specific date, completed instances included\n    agenda day --date 2026-09-01 --all"
    )]
    Day(cmd::view::ViewArgs),

    #[command(about = "Show the expanded view for a week (Monday start)")]
    Week(cmd::view::ViewArgs),

    #[command(
        about = "Show the expanded view for a month",
        after_help = "EXAMPLES:\n    # The calendar-grid window padded to whole weeks\n    agenda month --grid"
    )]
    Month(cmd::view::MonthArgs),

    #[command(about = "Show the expanded view for a year")]
    Year(cmd::view::ViewArgs),

    #[command(
        about = "Complete a task or one of its occurrences",
        after_help = "EXAMPLES:\n    # A one-off task\n    agenda done task-3\n\n    # One occurrence of a recurring task\n    agenda done task-5 --date 2026-09-01"
    )]
    Done(cmd::done::DoneArgs),

    #[command(about = "Reopen a completed occurrence")]
    Undo(cmd::done::UndoArgs),

    #[command(about = "Delete a task")]
    Rm(cmd::rm::RmArgs),

    #[command(
        about = "Render a recurrence rule as a phrase",
        after_help = "EXAMPLES:\n    agenda describe \"FREQ=WEEKLY;BYDAY=MO,WE,FR\""
    )]
    Describe(cmd::describe::DescribeArgs),

    #[command(
        about = "Create a task from an extraction response",
        long_about = "Validate a natural-language extraction response and create the task it describes. The response may be wrapped in prose.",
        after_help = "EXAMPLES:\n    agenda parse '{\"title\":\"llamar doctor\",\"priority\":1,\"dueDate\":null,\"recurrenceRule\":null}'"
    )]
    Parse(cmd::parse::ParseArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "agenda=debug,info"
        } else {
            "agenda=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();
    let owner = cli.owner.as_str();

    let command_result = match cli.command {
        Commands::Add(ref args) => cmd::add::run_add(args, owner, output, &project_root),
        Commands::Day(ref args) => {
            cmd::view::run_view(cmd::view::Span::Day, args, owner, output, &project_root)
        }
        Commands::Week(ref args) => {
            cmd::view::run_view(cmd::view::Span::Week, args, owner, output, &project_root)
        }
        Commands::Month(ref args) => cmd::view::run_month(args, owner, output, &project_root),
        Commands::Year(ref args) => {
            cmd::view::run_view(cmd::view::Span::Year, args, owner, output, &project_root)
        }
        Commands::Done(ref args) => cmd::done::run_done(args, owner, output, &project_root),
        Commands::Undo(ref args) => cmd::done::run_undo(args, output, &project_root),
        Commands::Rm(ref args) => cmd::rm::run_rm(args, output, &project_root),
        Commands::Describe(ref args) => cmd::describe::run_describe(args, output, &project_root),
        Commands::Parse(ref args) => cmd::parse::run_parse(args, owner, output, &project_root),
    };

    if let Err(err) = command_result {
        let code = error_code(&err);
        eprintln!("error[{code}]: {}", code.message());
        if let Some(hint) = code.hint() {
            eprintln!("hint: {hint}");
        }
        return Err(err);
    }
    Ok(())
}

/// Map a command failure to its stable code by walking the cause chain.
fn error_code(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(store) = cause.downcast_ref::<StoreError>() {
            return store.code();
        }
        if let Some(rule) = cause.downcast_ref::<RuleParseError>() {
            return rule.code();
        }
        if let Some(extraction) = cause.downcast_ref::<ExtractionError>() {
            return extraction.code();
        }
        if cause.downcast_ref::<toml::de::Error>().is_some() {
            return ErrorCode::ConfigParseError;
        }
    }
    ErrorCode::InternalUnexpected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["agenda", "--json", "week"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["agenda", "week", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn owner_defaults_to_local() {
        let cli = Cli::parse_from(["agenda", "day"]);
        assert_eq!(cli.owner, "local");
    }

    #[test]
    fn error_codes_resolve_through_the_cause_chain() {
        use anyhow::Context;

        let missing = anyhow::Error::from(StoreError::NotFound {
            entity: "task",
            id: "ghost".to_string(),
        })
        .context("while completing an occurrence");
        assert_eq!(error_code(&missing), ErrorCode::TaskNotFound);
        assert_eq!(error_code(&missing).code(), "E2002");

        let rule = anyhow::Error::from(RuleParseError::MissingFrequency);
        assert_eq!(error_code(&rule), ErrorCode::RuleParseError);

        let extraction = anyhow::Error::from(ExtractionError::NoJsonObject);
        assert_eq!(error_code(&extraction), ErrorCode::ExtractionParseError);

        let config = toml::from_str::<agenda_core::config::ProjectConfig>("display = [nope")
            .expect_err("must fail");
        assert_eq!(
            error_code(&anyhow::Error::from(config)),
            ErrorCode::ConfigParseError
        );

        let plain = anyhow::anyhow!("something else entirely");
        assert_eq!(error_code(&plain), ErrorCode::InternalUnexpected);
    }
}
