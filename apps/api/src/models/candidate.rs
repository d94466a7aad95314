use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate as stored. List-valued profile fields hold JSON text and are
/// decoded by `matching::parse::parse_candidate_data`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub projects: Option<String>,
    pub certifications: Option<String>,
    pub languages: Option<String>,
    pub education: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRecord {
    pub degree: String,
    pub institution: String,
    pub field: Option<String>,
    pub graduation_year: Option<i32>,
}

/// Typed profile fields shared by API payloads, AI-parsed resumes and the
/// decoded candidate view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub experience: Vec<WorkExperience>,
    pub projects: Vec<ProjectRecord>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub education: Option<EducationRecord>,
}

/// Insert payload for a candidate. The profile is encoded to JSON text at
/// write time.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub profile: CandidateProfile,
}
