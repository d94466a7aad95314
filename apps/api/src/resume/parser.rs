//! AI structuring of extracted resume text into a candidate profile.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::candidate::{CandidateProfile, NewCandidate};
use crate::resume::prompts::RESUME_PARSE_PROMPT;

/// Upper bound on resume text sent to the model.
const MAX_RESUME_CHARS: usize = 24_000;

/// Structured resume as returned by the model. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

impl ParsedResume {
    /// Builds the insert payload. Callers validate first; missing contact
    /// fields become empty strings here.
    pub fn into_new_candidate(self, job_id: Uuid, profile_url: Option<String>) -> NewCandidate {
        NewCandidate {
            job_id,
            name: self.name.unwrap_or_default().trim().to_string(),
            email: self.email.unwrap_or_default().trim().to_string(),
            phone: self.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            profile_url,
            location: self.location,
            summary: self.summary,
            profile: self.profile,
        }
    }
}

/// Sends resume text to the LLM and returns the structured profile.
pub async fn parse_resume(text: &str, llm: &LlmClient) -> Result<ParsedResume, AppError> {
    let prompt = build_parse_prompt(text);
    let parsed: ParsedResume = llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume parsing failed: {e}")))?;

    info!(
        "Parsed resume: {} skills, {} roles",
        parsed.profile.skills.len(),
        parsed.profile.experience.len()
    );
    Ok(parsed)
}

fn build_parse_prompt(text: &str) -> String {
    RESUME_PARSE_PROMPT
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{resume_text}", truncate_chars(text, MAX_RESUME_CHARS))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
