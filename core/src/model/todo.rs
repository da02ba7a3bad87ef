use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}' (expected pending, in_progress or completed)")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "in_progress" | "in-progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "due_date::deserialize"
    )]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(
        title: String,
        description: Option<String>,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            status: Status::default(),
            due_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lenient reader for `due_date`.
///
/// Older files may carry `""`, `null`, a full RFC 3339 timestamp, or the zero
/// timestamp `0001-01-01T00:00:00Z` for "no due date". All of these load; the
/// writer always emits plain `YYYY-MM-DD`.
pub mod due_date {
    use chrono::{DateTime, Datelike, NaiveDate};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s).map_err(de::Error::custom),
        }
    }

    pub fn parse(input: &str) -> Result<Option<NaiveDate>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        match DateTime::parse_from_rfc3339(input) {
            // year 1 is the zero value some writers use for "unset"
            Ok(dt) if dt.year() <= 1 => Ok(None),
            Ok(dt) => Ok(Some(dt.date_naive())),
            Err(_) => Err(format!("invalid due date '{}'", input)),
        }
    }
}
