//! Task model and computed properties.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Time left until a task's due date.
///
/// Tasks without a due date never run out of time: `Unbounded` compares
/// greater than every `Finite` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeRemaining {
    Finite(TimeDelta),
    Unbounded,
}

impl TimeRemaining {
    /// True iff the remaining time is finite and has run out.
    pub fn is_elapsed(&self) -> bool {
        match self {
            TimeRemaining::Finite(delta) => *delta <= TimeDelta::zero(),
            TimeRemaining::Unbounded => false,
        }
    }

    /// Remaining milliseconds, `None` when unbounded.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            TimeRemaining::Finite(delta) => Some(delta.num_milliseconds()),
            TimeRemaining::Unbounded => None,
        }
    }
}

/// A task in the store.
///
/// Tasks nest through `parent_id`; root tasks have no parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub complete: bool,
    pub due: Option<DateTime<Utc>>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Map a database row onto a Task.
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            complete: row.get("complete")?,
            due: row.get("due")?,
            parent_id: row.get("parent_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Time left until the due date, measured from the moment of the call.
    ///
    /// Recomputed on every call, never cached.
    pub fn time_remaining(&self) -> TimeRemaining {
        self.time_remaining_at(Utc::now())
    }

    /// Time left until the due date, measured from `now`.
    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> TimeRemaining {
        match self.due {
            Some(due) => TimeRemaining::Finite(due - now),
            None => TimeRemaining::Unbounded,
        }
    }

    /// True iff the task is incomplete and its due date has passed.
    ///
    /// A complete task is never overdue, whatever its due date.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Overdue check against an explicit reference time.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.complete && self.time_remaining_at(now).is_elapsed()
    }

    /// Get the status character for display.
    pub fn status_char(&self) -> char {
        if self.complete {
            '✓'
        } else if self.is_overdue() {
            '✗'
        } else {
            '○'
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub complete: bool,
    pub due: Option<DateTime<Utc>>,
    pub parent_id: Option<i64>,
}

impl NewTask {
    /// New incomplete task with the given name and nothing else set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the due date.
    pub fn due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Mark as already complete.
    pub fn completed(mut self) -> Self {
        self.complete = true;
        self
    }

    pub(crate) fn validate(&self) -> crate::error::Result<()> {
        validate_name(&self.name)
    }
}

/// Check the name invariant: never empty, never whitespace-only.
pub(crate) fn validate_name(name: &str) -> crate::error::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::error::Error::EmptyName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn task(complete: bool, due: Option<DateTime<Utc>>) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            name: "task".to_string(),
            complete,
            due,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn time_remaining_unbounded_without_due() {
        let task = task(false, None);
        assert_eq!(task.time_remaining(), TimeRemaining::Unbounded);
        assert_eq!(task.time_remaining().as_millis(), None);
    }

    #[test]
    fn time_remaining_is_due_minus_now() {
        let task = task(false, Some(Utc::now() + TimeDelta::days(1)));

        let ms = task.time_remaining().as_millis().unwrap();
        assert!(
            (ms - ONE_DAY_MS).abs() <= 10,
            "expected about one day, got {ms} ms"
        );
    }

    #[test]
    fn time_remaining_recomputed_per_call() {
        let now = Utc::now();
        let task = task(false, Some(now + TimeDelta::days(1)));

        let early = task.time_remaining_at(now);
        let late = task.time_remaining_at(now + TimeDelta::hours(1));
        assert!(late < early);
    }

    #[test]
    fn unbounded_outlasts_any_finite_remaining() {
        let finite = TimeRemaining::Finite(TimeDelta::days(365 * 100));
        assert!(finite < TimeRemaining::Unbounded);
    }

    #[test]
    fn overdue_when_due_in_past() {
        let task = task(false, Some(Utc::now() - TimeDelta::days(1)));
        assert!(task.is_overdue());
    }

    #[test]
    fn not_overdue_when_complete_despite_past_due() {
        let task = task(true, Some(Utc::now() - TimeDelta::days(1)));
        assert!(!task.is_overdue());
    }

    #[test]
    fn not_overdue_when_due_in_future() {
        let task = task(false, Some(Utc::now() + TimeDelta::days(1)));
        assert!(!task.is_overdue());
    }

    #[test]
    fn not_overdue_without_due() {
        let task = task(false, None);
        assert!(!task.is_overdue());
    }

    #[test]
    fn overdue_exactly_at_due() {
        let now = Utc::now();
        let task = task(false, Some(now));
        assert!(task.is_overdue_at(now));
    }

    #[test]
    fn status_char() {
        assert_eq!(task(true, None).status_char(), '✓');
        assert_eq!(task(false, None).status_char(), '○');
        assert_eq!(
            task(false, Some(Utc::now() - TimeDelta::days(1))).status_char(),
            '✗'
        );
    }

    #[test]
    fn new_task_builder() {
        let due = Utc::now();
        let new = NewTask::named("groceries").due(due).completed();
        assert_eq!(new.name, "groceries");
        assert_eq!(new.due, Some(due));
        assert!(new.complete);
        assert_eq!(new.parent_id, None);
    }

    #[test]
    fn validate_name_rejects_empty_and_whitespace() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("\t\n").is_err());
        assert!(validate_name("ok").is_ok());
    }
}
