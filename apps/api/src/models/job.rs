use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Comma-separated, e.g. "React, Node.js, AWS".
    pub required_skills: String,
    pub qualifications: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of a job posting used as matching input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: String,
    pub required_skills: String,
    pub qualifications: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
}

impl From<&JobRow> for JobRequirements {
    fn from(job: &JobRow) -> Self {
        Self {
            title: job.title.clone(),
            required_skills: job.required_skills.clone(),
            qualifications: job.qualifications.clone(),
            location: job.location.clone(),
            department: job.department.clone(),
        }
    }
}
