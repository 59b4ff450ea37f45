use serde::{Deserialize, Deserializer, Serialize};

/// A task-like record as handed over by the data-retrieval layer.
///
/// The record is treated as immutable input. Upstream normalization has
/// already happened: a missing assignee arrives as the literal string
/// `"Unassigned"`, and `status`/`priority` are free-form labels. Date fields
/// stay raw strings here; parsing and midnight alignment are the job of
/// [`crate::services::calendar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub key: String,
    pub assignee: String,
    pub status: String,
    pub priority: String,
    /// ISO-8601 creation timestamp.
    pub created: String,
    /// ISO-8601 due timestamp, if any.
    pub due: Option<String>,
    /// Precomputed duration in days. The wire value may be an empty string,
    /// which deserializes to `None`.
    #[serde(default, deserialize_with = "duration_days")]
    pub duration: Option<i64>,
}

impl TaskRecord {
    pub fn new(key: &str, assignee: &str, created: &str, due: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            assignee: assignee.to_string(),
            status: "Open".to_string(),
            priority: "Medium".to_string(),
            created: created.to_string(),
            due: due.map(str::to_string),
            duration: None,
        }
    }

    pub fn with_duration(mut self, days: i64) -> Self {
        self.duration = Some(days);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
}

fn duration_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Days(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Days(days)) => Some(days),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
