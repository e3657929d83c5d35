//! Job Model

use serde::{Deserialize, Serialize};

/// Job lifecycle status
///
/// Pending -> InProgress -> Submitted -> Verified is the normal path.
/// Which transitions an actor may take is decided by the server's
/// workflow rules, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum JobStatus {
    Pending,
    InProgress,
    Submitted,
    Verified,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::Verified => "VERIFIED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job entity (DB row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: JobStatus,
    /// Assignee user ID; None when unassigned or the assignee was removed
    pub assigned_to: Option<i64>,
    /// Creating supervisor/admin user ID
    pub created_by: Option<i64>,
    /// Due date (ISO 8601 date, YYYY-MM-DD)
    pub due_date: Option<String>,
    /// Milliseconds; present exactly while the job is Verified. Stamped
    /// on every entry into Verified, cleared on leaving it.
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Update job payload
///
/// Status is deliberately absent; status moves only through the
/// status endpoint so the workflow rules always apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusChange {
    pub status: JobStatus,
}

/// Job with assignee name resolved (for list/board views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct JobView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: JobStatus,
    pub assigned_to: Option<i64>,
    /// Username of the assignee; None when unassigned or removed
    pub assignee_name: Option<String>,
    pub created_by: Option<i64>,
    pub due_date: Option<String>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uses_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let status: JobStatus = serde_json::from_str("\"VERIFIED\"").unwrap();
        assert_eq!(status, JobStatus::Verified);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let result: Result<JobStatus, _> = serde_json::from_str("\"DONE\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(JobStatus::default(), JobStatus::Pending);
    }

    #[test]
    fn test_job_update_has_no_status_field() {
        // Deserializing a payload that tries to smuggle a status change
        // through the edit endpoint must not carry one.
        let update: JobUpdate =
            serde_json::from_str(r#"{"title":"Restock","status":"VERIFIED"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("Restock"));
        let round = serde_json::to_string(&update).unwrap();
        assert!(!round.contains("VERIFIED"));
    }
}
