//! Summary statistics shown on the home screen.

use crate::model::task::Task;
use serde::Serialize;

/// Counts derived from a task list at a reference time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Incomplete tasks due strictly after the reference time.
    pub upcoming: usize,
    /// Incomplete tasks due at or before the reference time.
    pub overdue: usize,
    /// Completed share in whole percent, rounded half up; 0 for an empty list.
    pub progress: u8,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], now_ms: i64) -> Self {
        let total = tasks.len();
        let completed = completed(tasks).count();
        let upcoming = tasks.iter().filter(|task| task.is_upcoming(now_ms)).count();
        let overdue = tasks.iter().filter(|task| task.is_overdue(now_ms)).count();

        Self {
            total,
            completed,
            upcoming,
            overdue,
            progress: progress_percent(completed, total),
        }
    }
}

/// Tasks still to do, in list order.
pub fn pending(tasks: &[Task]) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(|task| !task.completed)
}

/// Finished tasks, in list order.
pub fn completed(tasks: &[Task]) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(|task| task.completed)
}

fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Integer form of round(completed / total * 100) with halves rounded up.
    ((completed * 200 + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::{pending, progress_percent, TaskStats};
    use crate::model::task::{NewTask, Task};

    const NOW: i64 = 10_000;

    fn task(title: &str, completed: bool, due: Option<i64>) -> Task {
        let mut input = NewTask::new(title).completed(completed);
        input.due_date = due;
        Task::from_new(input, 0)
    }

    #[test]
    fn empty_list_has_zero_progress() {
        assert_eq!(TaskStats::compute(&[], NOW), TaskStats::default());
    }

    #[test]
    fn counts_each_bucket() {
        let tasks = vec![
            task("done", true, Some(NOW - 1)),
            task("late", false, Some(NOW - 1)),
            task("due now", false, Some(NOW)),
            task("soon", false, Some(NOW + 1)),
            task("someday", false, None),
        ];
        let stats = TaskStats::compute(&tasks, NOW);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.upcoming, 1);
        assert_eq!(stats.overdue, 2);
        assert_eq!(stats.progress, 20);
        assert_eq!(pending(&tasks).count(), 4);
    }

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(4, 4), 100);
    }
}
