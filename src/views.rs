//! Read-only views that combine collections written by different producers.
//!
//! Views never assume the collections they read correlate: a time block is not a
//! task, and either side may be missing entirely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar;
use crate::models::{CalendarTask, Priority, TASKS_KEY, TIME_BLOCKS_KEY, Task, TimeBlock};
use crate::repository::read_collection;
use crate::store::Store;

/// Number of task titles shown inside a calendar day cell.
pub const DAY_PREVIEW_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Tasks whose priority is missing or unrecognized.
    pub unset: usize,
}

impl PriorityDistribution {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high + self.medium + self.low + self.unset == 0
    }

    fn record(&mut self, priority: Option<Priority>) {
        match priority {
            Some(Priority::High) => self.high += 1,
            Some(Priority::Medium) => self.medium += 1,
            Some(Priority::Low) => self.low += 1,
            None => self.unset += 1,
        }
    }
}

/// The fields of a stored task the dashboard reads. Everything else may be
/// missing or foreign without hiding the task.
#[derive(Debug, Deserialize)]
struct TaskTally {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Option<Value>,
}

impl TaskTally {
    fn priority(&self) -> Option<Priority> {
        self.priority.as_ref()?.as_str()?.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
struct BlockTally {
    #[serde(default)]
    duration: Option<Value>,
}

impl BlockTally {
    fn minutes(&self) -> u64 {
        self.duration.as_ref().and_then(Value::as_u64).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardMetrics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Whole percent, 0 when there are no tasks.
    pub completion_rate: u8,
    pub priorities: PriorityDistribution,
    pub time_blocks: usize,
    pub total_scheduled_minutes: u64,
    /// Scheduled time rounded to whole hours.
    pub scheduled_hours: u64,
}

impl DashboardMetrics {
    pub fn compute(tasks: &[Task], blocks: &[TimeBlock]) -> Self {
        Self::tally(
            tasks.iter().map(|task| (task.completed, Some(task.priority))),
            blocks.iter().map(|block| u64::from(block.duration)),
        )
    }

    /// Read both collections straight from the store.
    ///
    /// Only `completed`, `priority` and `duration` are looked at, so records
    /// that a repository would set aside still count. Missing or malformed keys
    /// count as empty.
    pub fn from_store(store: &dyn Store) -> Self {
        let (tasks, _) = read_collection::<TaskTally>(store, TASKS_KEY);
        let (blocks, _) = read_collection::<BlockTally>(store, TIME_BLOCKS_KEY);
        Self::tally(
            tasks.iter().map(|task| (task.completed, task.priority())),
            blocks.iter().map(BlockTally::minutes),
        )
    }

    fn tally(
        tasks: impl Iterator<Item = (bool, Option<Priority>)>,
        block_minutes: impl Iterator<Item = u64>,
    ) -> Self {
        let mut total_tasks = 0;
        let mut completed_tasks = 0;
        let mut priorities = PriorityDistribution::default();
        for (completed, priority) in tasks {
            total_tasks += 1;
            completed_tasks += usize::from(completed);
            priorities.record(priority);
        }

        let mut time_blocks = 0;
        let mut total_scheduled_minutes = 0;
        for minutes in block_minutes {
            time_blocks += 1;
            total_scheduled_minutes += minutes;
        }

        Self {
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
            priorities,
            time_blocks,
            total_scheduled_minutes,
            scheduled_hours: round_div(total_scheduled_minutes, 60),
        }
    }

    pub fn high_priority_tasks(&self) -> usize {
        self.priorities.high
    }
}

/// `completed / total` as a whole percent, halves rounded up.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    u8::try_from(round_div(completed * 100, total as u64)).unwrap_or(100)
}

fn round_div(numerator: u64, denominator: u64) -> u64 {
    (numerator * 2 + denominator) / (denominator * 2)
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// First tasks of the day, up to [`DAY_PREVIEW_LIMIT`].
    pub preview: Vec<&'a CalendarTask>,
    /// Tasks not shown in `preview` ("+N more").
    pub overflow: usize,
    pub is_today: bool,
}

impl DayCell<'_> {
    pub fn total(&self) -> usize {
        self.preview.len() + self.overflow
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthView<'a> {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day 1 in a Sunday-first, seven-column grid.
    pub leading_blanks: u32,
    pub days: Vec<DayCell<'a>>,
}

impl<'a> MonthView<'a> {
    /// `None` if `(year, month)` is outside years 1-9999 or month 1-12.
    pub fn build(
        year: i32,
        month: u32,
        tasks: &'a [CalendarTask],
        today: NaiveDate,
    ) -> Option<Self> {
        let days_in_month = calendar::days_in_month(year, month)?;
        let leading_blanks = calendar::first_weekday_offset(year, month)?;
        let buckets = calendar::bucket_by_date(tasks);

        let mut days = Vec::with_capacity(days_in_month as usize);
        for day in 1..=days_in_month {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let on_day = buckets.get(&date).map(Vec::as_slice).unwrap_or_default();
            let preview: Vec<&CalendarTask> =
                on_day.iter().take(DAY_PREVIEW_LIMIT).copied().collect();
            days.push(DayCell {
                date,
                overflow: on_day.len() - preview.len(),
                preview,
                is_today: date == today,
            });
        }

        Some(Self {
            year,
            month,
            leading_blanks,
            days,
        })
    }

    /// e.g. `March 2024`
    pub fn title(&self) -> String {
        let name = calendar::month_name(self.month).unwrap_or("?");
        format!("{name} {}", self.year)
    }

    pub fn day(&self, day: u32) -> Option<&DayCell<'a>> {
        let index = usize::try_from(day).ok()?.checked_sub(1)?;
        self.days.get(index)
    }

    /// Number of grid rows needed to show the whole month.
    pub fn weeks(&self) -> usize {
        (self.leading_blanks as usize + self.days.len()).div_ceil(7)
    }
}
