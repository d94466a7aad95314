// Prompts for resume structuring and interview-question generation.

pub const RESUME_PARSE_PROMPT: &str = r#"Extract a structured candidate profile from the resume below.

Return a single JSON object with exactly these keys:
{
  "name": string or null,
  "email": string or null,
  "phone": string or null,
  "location": string or null,
  "summary": string or null,          // 1-3 sentences, in the candidate's own framing
  "skills": [string],                 // individual skills, e.g. "React", "PostgreSQL"
  "experience": [{"company": string, "position": string, "duration": string, "description": string}],
  "projects": [{"name": string, "description": string, "technologies": [string]}],
  "certifications": [string],
  "languages": [string],              // spoken languages
  "education": {"degree": string, "institution": string, "field": string or null, "graduation_year": number or null} or null
}

List the most recent role first. Keep skill names short and canonical.

{no_invention}

RESUME:
{resume_text}"#;

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"You are helping a recruiter prepare an interview.

JOB
Title: {job_title}
Department: {job_department}
Required skills: {required_skills}
Qualifications: {qualifications}

CANDIDATE PROFILE (JSON)
{candidate_profile}

SKILLS ANALYSIS
Matched: {matched_skills}
Missing: {missing_skills}

Write {question_count} interview questions. Probe the missing skills, ask for concrete
evidence behind the matched ones, and include at least one behavioural question
grounded in the candidate's listed experience.

Return a JSON object:
{"questions": [{"question": string, "category": "technical" | "behavioral" | "experience" | "gap", "rationale": string}]}

{no_invention}"#;
