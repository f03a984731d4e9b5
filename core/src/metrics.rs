//! Completion-time metrics derived from the unfiltered snapshot.
//!
//! A record contributes when it has both a creation and a completion
//! timestamp and the delta between them is positive; everything else is
//! skipped rather than dragging the averages toward zero.

use chrono::Duration;

use crate::types::{Priority, Todo};

/// Average time from creation to completion, overall and per priority.
/// `None` means no record in that bucket has completed yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionMetrics {
    pub overall: Option<Duration>,
    by_priority: [Option<Duration>; 4],
}

impl CompletionMetrics {
    pub fn compute(todos: &[Todo]) -> Self {
        let mut total = Duration::zero();
        let mut count = 0i32;
        let mut buckets = [(Duration::zero(), 0i32); 4];

        for todo in todos {
            let Some(done_date) = todo.done_date else {
                continue;
            };
            let elapsed = done_date - todo.created_at;
            if elapsed <= Duration::zero() {
                continue;
            }
            total = total + elapsed;
            count += 1;
            let bucket = &mut buckets[todo.priority as usize];
            bucket.0 = bucket.0 + elapsed;
            bucket.1 += 1;
        }

        CompletionMetrics {
            overall: (count > 0).then(|| total / count),
            by_priority: buckets.map(|(sum, n)| (n > 0).then(|| sum / n)),
        }
    }

    pub fn by_priority(&self, priority: Priority) -> Option<Duration> {
        self.by_priority[priority as usize]
    }
}

/// Render a duration with its two largest units: `"2d 4h"`, `"3m 12s"`.
/// Non-positive durations render as `"0s"`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs <= 0 {
        return "0s".to_string();
    }

    const MIN: i64 = 60;
    const HOUR: i64 = 60 * MIN;
    const DAY: i64 = 24 * HOUR;

    if secs >= DAY {
        let d = secs / DAY;
        let h = (secs % DAY) / HOUR;
        return if h > 0 { format!("{d}d {h}h") } else { format!("{d}d") };
    }
    if secs >= HOUR {
        let h = secs / HOUR;
        let m = (secs % HOUR) / MIN;
        return if m > 0 { format!("{h}h {m}m") } else { format!("{h}h") };
    }
    if secs >= MIN {
        let m = secs / MIN;
        let s = secs % MIN;
        return if s > 0 { format!("{m}m {s}s") } else { format!("{m}m") };
    }
    format!("{secs}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use chrono::{TimeZone, Utc};

    fn done_todo(id: u64, priority: Priority, minutes_to_finish: i64) -> Todo {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        Todo {
            id: TodoId::Number(id),
            title: format!("Task {id}"),
            description: None,
            priority,
            done: true,
            done_date: Some(created + Duration::minutes(minutes_to_finish)),
            created_at: created,
            updated_at: created,
            due_date: None,
        }
    }

    #[test]
    fn empty_dataset_has_no_averages() {
        let metrics = CompletionMetrics::compute(&[]);
        assert!(metrics.overall.is_none());
        for priority in Priority::ALL {
            assert!(metrics.by_priority(priority).is_none());
        }
    }

    #[test]
    fn averages_overall_and_per_priority() {
        let todos = vec![
            done_todo(1, Priority::Low, 10),
            done_todo(2, Priority::Low, 30),
            done_todo(3, Priority::High, 60),
        ];
        let metrics = CompletionMetrics::compute(&todos);
        assert_eq!(metrics.overall, Some(Duration::minutes(100) / 3));
        assert_eq!(metrics.by_priority(Priority::Low), Some(Duration::minutes(20)));
        assert_eq!(metrics.by_priority(Priority::High), Some(Duration::minutes(60)));
        assert!(metrics.by_priority(Priority::Medium).is_none());
    }

    #[test]
    fn open_and_backdated_records_are_skipped() {
        let mut open = done_todo(1, Priority::Medium, 10);
        open.done = false;
        open.done_date = None;

        // Completion before creation can happen with skewed server clocks.
        let backdated = done_todo(2, Priority::Medium, -5);

        let metrics = CompletionMetrics::compute(&[open, backdated]);
        assert!(metrics.overall.is_none());
    }

    #[test]
    fn formats_two_largest_units() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(Duration::seconds(-3)), "0s");
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(192)), "3m 12s");
        assert_eq!(format_duration(Duration::minutes(3)), "3m");
        assert_eq!(format_duration(Duration::minutes(125)), "2h 5m");
        assert_eq!(format_duration(Duration::hours(52)), "2d 4h");
        assert_eq!(format_duration(Duration::days(3)), "3d");
    }
}
