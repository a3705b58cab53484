// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the store. Never reused, even after deletion.
pub type TaskId = i64;

/// Closed set of categories a task can belong to.
///
/// Stored as its variant name in a `TEXT` column and serialized the same way
/// in JSON (`"Work"`, `"Personal"`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum Category {
    Work,
    Personal,
    Health,
    Education,
    Shopping,
    Finance,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Education,
        Category::Shopping,
        Category::Finance,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Shopping => "Shopping",
            Category::Finance => "Finance",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[allow(clippy::doc_overindented_list_items)]
/// Represents a task within the system.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: JSON with camelCase field names
///    (`dueDate`, `createdAt`, `updatedAt`).
/// - `sqlx::FromRow`: Allows `sqlx` to build a `Task` directly from a row
///    of the `tasks` table, whose columns are snake_case.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Category,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// An open task whose due date has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due_date| due_date < now)
    }

    /// Case-insensitive substring match against the title or the description.
    pub fn matches_text(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Body of `POST /tasks`.
///
/// `dueDate` accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date,
/// read as midnight UTC.
///
/// Fields are kept loose (`category` as raw text, `title` optional) so the
/// store can report a precise validation message instead of a generic
/// deserialization failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CreateTaskPayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Body of `PUT /tasks/{id}`.
///
/// Every field is tri-state: `None` means the key was absent and the stored
/// value is kept, `Some(None)` means an explicit `null`, `Some(Some(v))` sets
/// the value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_due_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed: Option<Option<bool>>,
}

impl UpdateTaskPayload {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(Some(category.to_string()));
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(Some(completed));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.category.is_none()
            && self.completed.is_none()
    }
}

// Only called when the key is present, so a `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses an RFC 3339 timestamp, falling back to a date-only value at
/// midnight UTC.
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
}

fn lenient_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|value| {
            parse_due_date(&value).ok_or_else(|| {
                serde::de::Error::custom(format!("`{value}` is not a valid date"))
            })
        })
        .transpose()
}

fn present_due_date<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_due_date(deserializer).map(Some)
}

/// Payload of every error response, and of the delete confirmation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parses_only_known_names() {
        assert_eq!("Health".parse::<Category>(), Ok(Category::Health));
        assert_eq!(
            "health".parse::<Category>(),
            Err(UnknownCategory("health".to_string()))
        );
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn update_payload_distinguishes_absent_from_null() {
        let payload: UpdateTaskPayload =
            serde_json::from_value(json!({ "title": "New", "dueDate": null })).unwrap();

        assert_eq!(payload.title, Some(Some("New".to_string())));
        assert_eq!(payload.due_date, Some(None));
        assert_eq!(payload.description, None);
        assert_eq!(payload.completed, None);
    }

    #[test]
    fn update_payload_serializes_only_supplied_fields() {
        let payload = UpdateTaskPayload::default()
            .completed(true)
            .due_date(None);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "completed": true, "dueDate": null }));
    }

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let now = Utc::now();
        let task = Task {
            id: 7,
            title: "Buy milk".to_string(),
            description: String::new(),
            due_date: None,
            category: Category::Shopping,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["category"], "Shopping");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("dueDate").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn text_match_is_case_insensitive_over_title_and_description() {
        let now = Utc::now();
        let task = Task {
            id: 1,
            title: "Gym".to_string(),
            description: "Leg DAY".to_string(),
            due_date: None,
            category: Category::Health,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        assert!(task.matches_text("gym"));
        assert!(task.matches_text("leg day"));
        assert!(!task.matches_text("milk"));
    }

    #[test]
    fn overdue_needs_a_past_due_date_and_an_open_task() {
        let now = Utc::now();
        let mut task = Task {
            id: 1,
            title: "Pay rent".to_string(),
            description: String::new(),
            due_date: None,
            category: Category::Finance,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        assert!(!task.is_overdue(now));

        task.due_date = Some(now - chrono::Duration::hours(1));
        assert!(task.is_overdue(now));

        task.completed = true;
        assert!(!task.is_overdue(now));

        task.completed = false;
        task.due_date = Some(now + chrono::Duration::hours(1));
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn due_date_accepts_date_only_values() {
        let payload: CreateTaskPayload =
            serde_json::from_value(json!({ "title": "Dentist", "dueDate": "2026-03-01" })).unwrap();
        assert_eq!(
            payload.due_date.map(|due_date| due_date.to_rfc3339()),
            Some("2026-03-01T00:00:00+00:00".to_string())
        );

        let payload: UpdateTaskPayload =
            serde_json::from_value(json!({ "dueDate": "2026-03-01T09:30:00+02:00" })).unwrap();
        assert_eq!(
            payload.due_date,
            Some(parse_due_date("2026-03-01T07:30:00Z"))
        );

        let cleared: UpdateTaskPayload =
            serde_json::from_value(json!({ "dueDate": null })).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        assert!(serde_json::from_value::<CreateTaskPayload>(json!({ "dueDate": "soon" })).is_err());
    }
}
