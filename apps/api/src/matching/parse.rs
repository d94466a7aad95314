//! Lenient decoding of the JSON-text profile columns on `candidates`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::{CandidateProfile, CandidateRow};

/// Read-time view of a candidate with every serialized field decoded.
/// Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCandidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decodes each JSON-text field independently. A field that is absent or
/// malformed becomes an empty list (or `None` for `education`); the others
/// are unaffected. Never fails.
pub fn parse_candidate_data(raw: &CandidateRow) -> ParsedCandidate {
    let profile = CandidateProfile {
        skills: decode_list(raw.id, "skills", raw.skills.as_deref()),
        experience: decode_list(raw.id, "experience", raw.experience.as_deref()),
        projects: decode_list(raw.id, "projects", raw.projects.as_deref()),
        certifications: decode_list(raw.id, "certifications", raw.certifications.as_deref()),
        languages: decode_list(raw.id, "languages", raw.languages.as_deref()),
        education: decode_value(raw.id, "education", raw.education.as_deref()),
    };

    ParsedCandidate {
        id: raw.id,
        job_id: raw.job_id,
        name: raw.name.clone(),
        email: raw.email.clone(),
        phone: raw.phone.clone(),
        profile_url: raw.profile_url.clone(),
        status: raw.status.clone(),
        location: raw.location.clone(),
        summary: raw.summary.clone(),
        profile,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

fn decode_list<T: DeserializeOwned>(id: Uuid, field: &str, text: Option<&str>) -> Vec<T> {
    decode_value::<Vec<T>>(id, field, text).unwrap_or_default()
}

fn decode_value<T: DeserializeOwned>(id: Uuid, field: &str, text: Option<&str>) -> Option<T> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    match serde_json::from_str::<Option<T>>(text) {
        Ok(value) => value,
        Err(e) => {
            debug!("candidate {id}: field '{field}' is not valid JSON ({e}); using default");
            None
        }
    }
}
