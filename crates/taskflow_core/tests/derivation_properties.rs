use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use taskflow_core::{
    filter, sort, stats, Category, KvTaskRepository, MemoryKvStore, Priority, SortKey, Task,
    TaskFilter, TaskId, TaskRepository, TaskStatus,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn any_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

fn any_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Cancelled),
    ]
}

fn any_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Personal),
        Just(Category::Work),
        Just(Category::Health),
        Just(Category::Learning),
        Just(Category::Finance),
    ]
}

fn any_task() -> impl Strategy<Value = Task> {
    (
        "[a-z]{1,12}",
        "[a-z ]{0,20}",
        any_priority(),
        any_status(),
        any_category(),
        proptest::option::of(0i64..60),
        proptest::collection::btree_set("[a-z]{1,6}", 0..3),
        0i64..100_000,
        0i64..100_000,
    )
        .prop_map(
            |(title, description, priority, status, category, due, tags, created, bump)| {
                let created_at = base_time() + Duration::minutes(created);
                Task {
                    id: TaskId::generate(),
                    title,
                    description,
                    priority,
                    status,
                    category,
                    due_date: due.map(|offset| base_date() + Duration::days(offset)),
                    tags: tags.into_iter().collect(),
                    created_at,
                    updated_at: created_at + Duration::minutes(bump),
                }
            },
        )
}

fn any_tasks() -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(any_task(), 0..24)
}

proptest! {
    #[test]
    fn due_date_sort_puts_undated_last_and_dated_non_decreasing(tasks in any_tasks()) {
        let sorted = sort(&tasks, SortKey::DueDate);
        prop_assert_eq!(sorted.len(), tasks.len());

        let first_undated = sorted
            .iter()
            .position(|task| task.due_date.is_none())
            .unwrap_or(sorted.len());
        prop_assert!(sorted[first_undated..].iter().all(|task| task.due_date.is_none()));

        let dated: Vec<NaiveDate> = sorted[..first_undated]
            .iter()
            .filter_map(|task| task.due_date)
            .collect();
        prop_assert_eq!(dated.len(), first_undated);
        prop_assert!(dated.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn every_sort_key_is_stable(tasks in any_tasks()) {
        for key in [SortKey::Priority, SortKey::DueDate, SortKey::Created, SortKey::Title] {
            let sorted = sort(&tasks, key);
            for pair in sorted.windows(2) {
                let left = tasks.iter().position(|task| task.id == pair[0].id).unwrap();
                let right = tasks.iter().position(|task| task.id == pair[1].id).unwrap();
                if taskflow_core::derivation::sort::compare(&pair[0], &pair[1], key).is_eq() {
                    prop_assert!(left < right);
                }
            }
        }
    }

    #[test]
    fn stats_status_counts_partition_total(tasks in any_tasks(), day in 0i64..60) {
        let now = base_time() + Duration::days(day);
        let result = stats(&tasks, &now);
        prop_assert_eq!(result.total, tasks.len());
        prop_assert_eq!(
            result.completed + result.pending + result.in_progress + result.cancelled,
            result.total
        );
        prop_assert!(result.completion_rate <= 100);
        let by_priority: usize = Priority::ALL
            .iter()
            .map(|priority| result.priority_breakdown.count(*priority))
            .sum();
        prop_assert_eq!(by_priority, result.total);
    }

    #[test]
    fn overdue_never_contains_completed(tasks in any_tasks(), day in 0i64..60) {
        let now = base_time() + Duration::days(day);
        let overdue = filter(&tasks, TaskFilter::Overdue, &now);
        prop_assert!(overdue.iter().all(|task| task.status != TaskStatus::Completed));
        prop_assert!(overdue.iter().all(|task| task.due_date.is_some_and(|due| due < now.date_naive())));
    }

    #[test]
    fn persisted_collection_round_trips(tasks in any_tasks()) {
        let mut repo = KvTaskRepository::new(MemoryKvStore::new());
        repo.save_tasks(&tasks).unwrap();
        prop_assert_eq!(repo.load_tasks(), tasks);
    }
}

#[test]
fn empty_collection_completion_rate_is_zero() {
    assert_eq!(stats(&[], &base_time()).completion_rate, 0);
}
