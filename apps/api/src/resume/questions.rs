//! AI-generated interview questions for a candidate/job pair.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::matching::parse::ParsedCandidate;
use crate::matching::skills::SkillsMatch;
use crate::models::job::JobRow;
use crate::resume::prompts::INTERVIEW_QUESTIONS_PROMPT;

pub const DEFAULT_QUESTION_COUNT: usize = 8;
pub const MAX_QUESTION_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    Experience,
    Gap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub category: QuestionCategory,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestionSet {
    pub questions: Vec<InterviewQuestion>,
}

pub async fn generate_interview_questions(
    candidate: &ParsedCandidate,
    job: &JobRow,
    skills_match: &SkillsMatch,
    question_count: usize,
    llm: &LlmClient,
) -> Result<InterviewQuestionSet, AppError> {
    let prompt = build_questions_prompt(candidate, job, skills_match, question_count)?;
    let mut set: InterviewQuestionSet = llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    set.questions.retain(|q| !q.question.trim().is_empty());
    set.questions.truncate(question_count);
    Ok(set)
}

fn build_questions_prompt(
    candidate: &ParsedCandidate,
    job: &JobRow,
    skills_match: &SkillsMatch,
    question_count: usize,
) -> Result<String, AppError> {
    // Contact details are left out of the prompt.
    let profile = serde_json::to_string_pretty(&serde_json::json!({
        "location": candidate.location,
        "summary": candidate.summary,
        "skills": candidate.profile.skills,
        "experience": candidate.profile.experience,
        "projects": candidate.profile.projects,
        "certifications": candidate.profile.certifications,
        "education": candidate.profile.education,
    }))
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(INTERVIEW_QUESTIONS_PROMPT
        .replace("{job_title}", &job.title)
        .replace("{job_department}", job.department.as_deref().unwrap_or("n/a"))
        .replace("{required_skills}", &job.required_skills)
        .replace("{qualifications}", job.qualifications.as_deref().unwrap_or("n/a"))
        .replace("{candidate_profile}", &profile)
        .replace("{matched_skills}", &list_or_none(&skills_match.matched_skills))
        .replace("{missing_skills}", &list_or_none(&skills_match.missing_skills))
        .replace("{question_count}", &question_count.to_string())
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION))
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::skills::calculate_skills_match;
    use crate::models::candidate::CandidateProfile;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_job() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Full-stack Engineer".to_string(),
            description: None,
            required_skills: "React, Node.js, AWS".to_string(),
            qualifications: None,
            location: Some("Remote".to_string()),
            department: Some("Product".to_string()),
            status: "open".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_candidate() -> ParsedCandidate {
        ParsedCandidate {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("555 010 0199".to_string()),
            profile_url: None,
            status: "new".to_string(),
            location: None,
            summary: Some("Frontend specialist".to_string()),
            profile: CandidateProfile {
                skills: vec!["react".to_string(), "express".to_string()],
                ..Default::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_includes_gaps_and_excludes_contact_details() {
        let candidate = make_candidate();
        let skills = calculate_skills_match(&candidate.profile.skills, &["React", "Node.js", "AWS"]);
        let prompt = build_questions_prompt(&candidate, &make_job(), &skills, 5).unwrap();

        assert!(prompt.contains("Missing: Node.js, AWS"));
        assert!(prompt.contains("Matched: React"));
        assert!(prompt.contains("Write 5 interview questions"));
        assert!(prompt.contains("Frontend specialist"));
        assert!(!prompt.contains("jane@example.com"));
        assert!(!prompt.contains("555 010 0199"));
        assert!(!prompt.contains("{no_invention}"));
    }

    #[test]
    fn test_question_set_deserializes() {
        let json = r#"{"questions": [
            {"question": "How have you deployed Node services?", "category": "gap", "rationale": "Node.js missing"}
        ]}"#;
        let set: InterviewQuestionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.questions[0].category, QuestionCategory::Gap);
    }

    #[test]
    fn test_list_or_none() {
        assert_eq!(list_or_none(&[]), "none");
        assert_eq!(list_or_none(&["a".to_string(), "b".to_string()]), "a, b");
    }
}
