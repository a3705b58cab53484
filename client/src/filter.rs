// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::str::FromStr;

use common::{Category, Task, UnknownCategory};

/// Category predicate: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    /// `"all"` or a category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Completion predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// The three independent predicates that derive the visible list.
/// An empty query matches every task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub query: String,
    pub category: CategoryFilter,
    pub status: StatusFilter,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let text = self.query.is_empty() || task.matches_text(&self.query);
        let category = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category == category,
        };
        let status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        };
        text && category && status
    }

    /// Returns the matching tasks, keeping list order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, title: &str, category: Category, completed: bool) -> Task {
        let now = Utc::now();
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            due_date: None,
            category,
            completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Buy milk", Category::Shopping, false),
            task(2, "Gym", Category::Health, true),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn search_and_category_compose() {
        let tasks = sample();

        let by_text = TaskFilter {
            query: "milk".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&by_text.apply(&tasks)), vec![1]);

        let by_category = TaskFilter {
            category: CategoryFilter::Only(Category::Health),
            ..Default::default()
        };
        assert_eq!(ids(&by_category.apply(&tasks)), vec![2]);

        let both = TaskFilter {
            query: "milk".to_string(),
            category: CategoryFilter::Only(Category::Health),
            ..Default::default()
        };
        assert!(both.apply(&tasks).is_empty());
    }

    #[test]
    fn status_filter() {
        let tasks = sample();

        let active = TaskFilter {
            status: StatusFilter::Active,
            ..Default::default()
        };
        let completed = TaskFilter {
            status: StatusFilter::Completed,
            ..Default::default()
        };
        assert_eq!(ids(&active.apply(&tasks)), vec![1]);
        assert_eq!(ids(&completed.apply(&tasks)), vec![2]);
    }

    #[test]
    fn default_filter_keeps_everything() {
        let tasks = sample();
        assert_eq!(TaskFilter::default().apply(&tasks), tasks);
    }

    #[test]
    fn category_filter_parses_all_and_names() {
        assert_eq!("all".parse(), Ok(CategoryFilter::All));
        assert_eq!("Finance".parse(), Ok(CategoryFilter::Only(Category::Finance)));
        assert!("Groceries".parse::<CategoryFilter>().is_err());
    }
}
