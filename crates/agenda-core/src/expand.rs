//! Instance expansion: tasks + completions + window → ordered occurrences.
//!
//! Expansion is a pure function of its inputs. It never mutates shared
//! state and never fails for a single malformed task: a task whose rule
//! does not parse contributes zero instances and a `warn!`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::index::CompletionIndex;
use crate::model::instance::TaskInstance;
use crate::model::task::{Task, TaskStatus};
use crate::rule::Rule;
use crate::window::Window;

/// Expand `tasks` into the ordered instance list for `window`.
///
/// Non-recurring tasks contribute at most one instance (their due date, if
/// inside the window); recurring tasks contribute one instance per rule
/// occurrence, each tagged completed from the index. With `hide_completed`
/// the completed instances are dropped. Output is sorted ascending by
/// instance date-time, ties broken by priority with unset priority last.
#[must_use]
pub fn expand_tasks(
    tasks: &[Task],
    window: &Window,
    index: &CompletionIndex,
    hide_completed: bool,
) -> Vec<TaskInstance> {
    let mut instances: Vec<TaskInstance> = Vec::new();

    for task in tasks {
        expand_one(task, window, index, &mut instances);
    }

    if hide_completed {
        instances.retain(|i| !i.completed);
    }
    instances.sort_by(TaskInstance::display_cmp);
    instances
}

fn expand_one(task: &Task, window: &Window, index: &CompletionIndex, out: &mut Vec<TaskInstance>) {
    let Some(rule_text) = task.recurrence_rule.as_deref() else {
        let Some(due) = task.due_date else {
            return;
        };
        if window.contains(due) {
            out.push(TaskInstance {
                id: task.id.clone(),
                parent_task_id: task.id.clone(),
                title: task.title.clone(),
                priority: task.priority,
                instance_date: due,
                recurring: false,
                recurrence_rule: None,
                // One-off tasks complete through their lifecycle status.
                completed: task.status == TaskStatus::Completed,
            });
        }
        return;
    };

    let rule = match Rule::parse(rule_text) {
        Ok(rule) => rule,
        Err(err) => {
            warn!(task_id = %task.id, rule = rule_text, %err, "skipping task with malformed recurrence rule");
            return;
        }
    };

    // A completed recurring task keeps enumerating: completion is
    // per-occurrence, via the index, never per-task.
    for occurrence in rule.occurrences_between(task.anchor(), window.start, window.end) {
        let id = TaskInstance::occurrence_id(&task.id, occurrence);
        let completed = index.contains_key(&id);
        out.push(TaskInstance {
            id,
            parent_task_id: task.id.clone(),
            title: task.title.clone(),
            priority: task.priority,
            instance_date: occurrence,
            recurring: true,
            recurrence_rule: Some(rule_text.to_string()),
            completed,
        });
    }
}

/// Group instances by their local calendar day, days in ascending order.
#[must_use]
pub fn group_by_date(instances: &[TaskInstance]) -> BTreeMap<NaiveDate, Vec<TaskInstance>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<TaskInstance>> = BTreeMap::new();
    for instance in instances {
        grouped
            .entry(instance.instance_date.date_naive())
            .or_default()
            .push(instance.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        utc()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid datetime")
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            title: format!("task {id}"),
            priority: None,
            due_date: None,
            recurrence_rule: None,
            status: TaskStatus::Active,
            created_at: at(2024, 1, 1, 0),
        }
    }

    fn march_week() -> Window {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date");
        Window::week(date, utc())
    }

    #[test]
    fn one_off_inside_window_appears_once_with_its_date() {
        // Due Sunday 2024-03-10 15:00-05:00, window = week of Mar 4..10.
        let offset = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        let due = offset
            .with_ymd_and_hms(2024, 3, 10, 15, 0, 0)
            .single()
            .expect("valid datetime");
        let mut a = task("a");
        a.due_date = Some(due);

        let got = expand_tasks(&[a], &march_week(), &CompletionIndex::new(), true);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "a");
        assert_eq!(got[0].instance_date, due);
        assert!(!got[0].recurring);
    }

    #[test]
    fn one_off_outside_window_contributes_nothing() {
        let mut a = task("a");
        a.due_date = Some(at(2024, 3, 11, 9));
        let got = expand_tasks(&[a], &march_week(), &CompletionIndex::new(), true);
        assert!(got.is_empty());
    }

    #[test]
    fn one_off_without_due_date_contributes_nothing() {
        let got = expand_tasks(&[task("a")], &march_week(), &CompletionIndex::new(), true);
        assert!(got.is_empty());
    }

    #[test]
    fn recurring_instances_get_date_keyed_ids_and_completion_flags() {
        let mut b = task("b");
        b.due_date = Some(at(2024, 3, 4, 9));
        b.recurrence_rule = Some("FREQ=DAILY".to_string());

        let mut index = CompletionIndex::new();
        index.insert("b", chrono::NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date"));

        let got = expand_tasks(&[b], &march_week(), &index, false);
        assert_eq!(got.len(), 7);
        assert_eq!(got[0].id, "b_2024-03-04");
        assert!(got.iter().all(|i| i.recurring));
        let completed: Vec<&str> = got
            .iter()
            .filter(|i| i.completed)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(completed, vec!["b_2024-03-05"]);
    }

    #[test]
    fn hide_completed_drops_completed_instances() {
        let mut b = task("b");
        b.due_date = Some(at(2024, 3, 4, 9));
        b.recurrence_rule = Some("FREQ=DAILY".to_string());

        let mut index = CompletionIndex::new();
        index.insert("b", chrono::NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date"));

        let got = expand_tasks(&[b], &march_week(), &index, true);
        assert_eq!(got.len(), 6);
        assert!(got.iter().all(|i| !i.completed));
    }

    #[test]
    fn completed_recurring_task_still_enumerates() {
        let mut b = task("b");
        b.due_date = Some(at(2024, 3, 4, 9));
        b.recurrence_rule = Some("FREQ=DAILY".to_string());
        b.status = TaskStatus::Completed;

        let got = expand_tasks(&[b], &march_week(), &CompletionIndex::new(), true);
        assert_eq!(got.len(), 7);
    }

    #[test]
    fn malformed_rule_is_skipped_without_failing_the_batch() {
        let mut bad = task("bad");
        bad.due_date = Some(at(2024, 3, 4, 9));
        bad.recurrence_rule = Some("FREQ=SOMETIMES".to_string());

        let mut good = task("good");
        good.due_date = Some(at(2024, 3, 6, 9));

        let got = expand_tasks(&[bad, good], &march_week(), &CompletionIndex::new(), true);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "good");
    }

    #[test]
    fn sorted_by_date_then_priority_with_unset_last() {
        let mut tasks = Vec::new();
        for (id, priority) in [
            ("n", None),
            ("h", Some(Priority::High)),
            ("l", Some(Priority::Low)),
            ("m", Some(Priority::Medium)),
        ] {
            let mut t = task(id);
            t.priority = priority;
            t.due_date = Some(at(2024, 3, 6, 9));
            tasks.push(t);
        }
        let mut early = task("early");
        early.due_date = Some(at(2024, 3, 5, 9));
        tasks.push(early);

        let got = expand_tasks(&tasks, &march_week(), &CompletionIndex::new(), true);
        let ids: Vec<&str> = got.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "h", "m", "l", "n"]);
    }

    #[test]
    fn expansion_is_idempotent() {
        let mut b = task("b");
        b.due_date = Some(at(2024, 3, 4, 9));
        b.recurrence_rule = Some("FREQ=WEEKLY;BYDAY=MO,WE,FR".to_string());
        let index = CompletionIndex::new();

        let first = expand_tasks(std::slice::from_ref(&b), &march_week(), &index, true);
        let second = expand_tasks(std::slice::from_ref(&b), &march_week(), &index, true);
        assert_eq!(first, second);
    }

    #[test]
    fn group_by_date_buckets_on_local_day() {
        let mut b = task("b");
        b.due_date = Some(at(2024, 3, 4, 9));
        b.recurrence_rule = Some("FREQ=DAILY;INTERVAL=2".to_string());

        let got = expand_tasks(&[b], &march_week(), &CompletionIndex::new(), true);
        let grouped = group_by_date(&got);
        assert_eq!(grouped.len(), 4);
        let mar4 = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date");
        assert_eq!(grouped.get(&mar4).map(Vec::len), Some(1));
    }
}
