//! Derived plan and archive statistics.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Archive, Category, PlannedQueue};
use crate::timer::TimerSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatistics {
    /// Planned repeats across all entries.
    pub tasks_count: u64,
    /// Work time those repeats add up to, in milliseconds.
    pub tasks_time_ms: u64,
    /// When the first long break would start if work began now.
    pub next_long_break: Option<DateTime<Utc>>,
    /// When the whole plan, breaks included, would be done if work began now.
    pub finish_time: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStatistics {
    pub tasks_count: u64,
    pub tasks_time_ms: u64,
    pub categories: Vec<CategoryCount>,
}

impl PlanStatistics {
    pub fn compute(queue: &PlannedQueue, settings: &TimerSettings, now: DateTime<Utc>) -> Self {
        let tasks_count = queue.total_count();
        let long_break_after = u64::from(settings.max_short_breaks_serie) + 1;
        let long_breaks = tasks_count / long_break_after;
        let short_breaks = tasks_count.saturating_sub(1).saturating_sub(long_breaks);

        let total_ms = tasks_count
            .saturating_mul(settings.task_ms)
            .saturating_add(short_breaks.saturating_mul(settings.short_break_ms))
            .saturating_add(long_breaks.saturating_mul(settings.long_break_ms));
        let finish_time = (tasks_count > 0)
            .then(|| after(now, total_ms))
            .flatten();

        let until_long_break = long_break_after
            .saturating_mul(settings.task_ms)
            .saturating_add((long_break_after - 1).saturating_mul(settings.short_break_ms));
        let next_long_break = (tasks_count >= long_break_after)
            .then(|| after(now, until_long_break))
            .flatten();

        let categories = count_categories(
            queue
                .entries()
                .iter()
                .map(|e| (&e.task.category, u64::from(e.count))),
        );

        Self {
            tasks_count,
            tasks_time_ms: tasks_count.saturating_mul(settings.task_ms),
            next_long_break,
            finish_time,
            categories,
        }
    }
}

impl ArchiveStatistics {
    pub fn compute(archive: &Archive) -> Self {
        let entries = archive.entries();
        Self {
            tasks_count: entries.len() as u64,
            tasks_time_ms: entries.iter().fold(0, |sum, e| sum.saturating_add(e.task_time_ms)),
            categories: count_categories(entries.iter().map(|e| (&e.task.category, 1))),
        }
    }
}

/// `None` when the instant is past what a timestamp can hold.
fn after(now: DateTime<Utc>, ms: u64) -> Option<DateTime<Utc>> {
    let delta = Duration::try_milliseconds(i64::try_from(ms).ok()?)?;
    now.checked_add_signed(delta)
}

fn count_categories<'a>(items: impl Iterator<Item = (&'a Category, u64)>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for (category, count) in items {
        *counts.entry(category.name.as_str()).or_default() += count;
    }
    counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            category: Category::new(name),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{ArchiveEntry, WorkItem};

    const MIN: u64 = 60_000;

    fn settings() -> TimerSettings {
        TimerSettings {
            task_ms: 25 * MIN,
            short_break_ms: 5 * MIN,
            long_break_ms: 15 * MIN,
            max_short_breaks_serie: 3,
        }
    }

    #[test]
    fn empty_plan_has_no_times() {
        let stats = PlanStatistics::compute(&PlannedQueue::new(), &settings(), Utc::now());
        assert_eq!(stats.tasks_count, 0);
        assert!(stats.finish_time.is_none());
        assert!(stats.next_long_break.is_none());
    }

    #[test]
    fn plan_totals_include_breaks() {
        let now = Utc::now();
        let mut queue = PlannedQueue::new();
        queue.push_front(WorkItem::with_id("a", "Code", "A"), 3).unwrap();
        queue.push_front(WorkItem::with_id("b", "Mail", "B"), 2).unwrap();
        let stats = PlanStatistics::compute(&queue, &settings(), now);

        assert_eq!(stats.tasks_count, 5);
        assert_eq!(stats.tasks_time_ms, 125 * MIN);
        // 5 tasks, 1 long break after the 4th, 3 short breaks.
        assert_eq!(stats.finish_time, Some(now + Duration::minutes(125 + 15 + 15)));
        assert_eq!(stats.next_long_break, Some(now + Duration::minutes(100 + 15)));
        assert_eq!(
            stats.categories,
            vec![
                CategoryCount { category: Category::new("Code"), count: 3 },
                CategoryCount { category: Category::new("Mail"), count: 2 },
            ]
        );
    }

    #[test]
    fn huge_plans_saturate_instead_of_overflowing() {
        let huge = TimerSettings {
            task_ms: u64::MAX / 2,
            short_break_ms: u64::MAX / 2,
            long_break_ms: u64::MAX / 2,
            max_short_breaks_serie: u32::MAX,
        };
        let mut queue = PlannedQueue::new();
        queue.push_front(WorkItem::with_id("a", "Code", "A"), u32::MAX).unwrap();
        queue.push_front(WorkItem::with_id("b", "Code", "B"), u32::MAX).unwrap();
        let stats = PlanStatistics::compute(&queue, &huge, Utc::now());

        assert_eq!(stats.tasks_count, 2 * u64::from(u32::MAX));
        assert_eq!(stats.tasks_time_ms, u64::MAX);
        assert!(stats.finish_time.is_none());
        assert!(stats.next_long_break.is_none());
    }

    #[test]
    fn finish_time_past_timestamp_range_is_none() {
        let long = TimerSettings {
            task_ms: 200 * 365 * 24 * 60 * MIN,
            ..settings()
        };
        let mut queue = PlannedQueue::new();
        queue.push_front(WorkItem::with_id("a", "Code", "A"), 2_000_000).unwrap();
        let stats = PlanStatistics::compute(&queue, &long, Utc::now());
        assert!(stats.finish_time.is_none());
        assert!(stats.next_long_break.is_some());
    }

    #[test]
    fn archive_totals_sum_task_time() {
        let archive: Archive = [
            ArchiveEntry::new(WorkItem::with_id("a", "Code", "A"), 25 * MIN, None),
            ArchiveEntry::new(WorkItem::with_id("b", "Code", "B"), 25 * MIN, Some(10 * MIN)),
        ]
        .into_iter()
        .collect();
        let stats = ArchiveStatistics::compute(&archive);
        assert_eq!(stats.tasks_count, 2);
        assert_eq!(stats.tasks_time_ms, 40 * MIN);
        assert_eq!(stats.categories[0].count, 2);
    }
}
