//! Output layer shared by all commands: human text or stable JSON.

use agenda_core::{Priority, Task, TaskInstance, group_by_date};
use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render any serializable value as JSON, or via `human` otherwise.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        human(value, &mut out)?;
    }
    Ok(())
}

/// Render an expanded instance list grouped by calendar day.
pub fn render_instances(mode: OutputMode, instances: &[TaskInstance]) -> anyhow::Result<()> {
    render(mode, &instances, |instances, out| {
        if instances.is_empty() {
            return writeln!(out, "No tasks in this window.");
        }
        for (day, group) in group_by_date(instances) {
            writeln!(out, "{day}")?;
            for instance in group {
                writeln!(
                    out,
                    "  [{}] {:>2} {:<5} {}{}",
                    if instance.completed { "x" } else { " " },
                    instance.instance_date.format("%H:%M"),
                    priority_tag(instance.priority),
                    instance.title,
                    if instance.recurring { "  (recurring)" } else { "" },
                )?;
            }
        }
        Ok(())
    })
}

/// Render a single task row, e.g. after creation.
pub fn render_task(mode: OutputMode, task: &Task) -> anyhow::Result<()> {
    render(mode, task, |task, out| {
        write!(out, "{}  {}", task.id, task.title)?;
        if let Some(priority) = task.priority {
            write!(out, "  [{priority}]")?;
        }
        if let Some(due) = task.due_date {
            write!(out, "  due {}", due.format("%Y-%m-%d %H:%M"))?;
        }
        if let Some(rule) = &task.recurrence_rule {
            write!(out, "  {rule}")?;
        }
        writeln!(out)
    })
}

/// Render a plain confirmation message.
pub fn render_message(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    if mode.is_json() {
        println!("{}", serde_json::json!({ "ok": true, "message": message }));
    } else {
        println!("{message}");
    }
    Ok(())
}

const fn priority_tag(priority: Option<Priority>) -> &'static str {
    match priority {
        Some(Priority::High) => "high",
        Some(Priority::Medium) => "med",
        Some(Priority::Low) => "low",
        None => "",
    }
}
