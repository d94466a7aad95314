//! Count-based comparison of candidate skills against a job's required skills.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsMatch {
    pub total_skills: usize,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_percentage: u32, // 0 – 100
}

/// Splits a job's comma-separated `required_skills` text into trimmed,
/// non-empty entries.
pub fn split_required_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A required skill is matched when any candidate skill, compared
/// case-insensitively, equals it or either one contains the other.
/// Matched and missing entries keep the required skill's casing.
pub fn calculate_skills_match<C, R>(candidate_skills: &[C], required_skills: &[R]) -> SkillsMatch
where
    C: AsRef<str>,
    R: AsRef<str>,
{
    let candidate_lower: Vec<String> = candidate_skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();

    for required in required_skills {
        let required = required.as_ref().trim();
        if required.is_empty() {
            continue;
        }
        let required_lower = required.to_lowercase();

        let found = candidate_lower.iter().any(|candidate| {
            *candidate == required_lower
                || candidate.contains(&required_lower)
                || required_lower.contains(candidate.as_str())
        });

        if found {
            matched_skills.push(required.to_string());
        } else {
            missing_skills.push(required.to_string());
        }
    }

    let total_skills = matched_skills.len() + missing_skills.len();
    let match_percentage = if total_skills > 0 {
        ((matched_skills.len() as f64 / total_skills as f64) * 100.0).round() as u32
    } else {
        0
    };

    SkillsMatch {
        total_skills,
        matched_skills,
        missing_skills,
        match_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_score_zero() {
        let result = calculate_skills_match::<&str, &str>(&[], &[]);
        assert_eq!(result.total_skills, 0);
        assert_eq!(result.match_percentage, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_case_insensitive_full_match() {
        let result = calculate_skills_match(&["Python"], &["python"]);
        assert_eq!(result.match_percentage, 100);
        assert_eq!(result.matched_skills, vec!["python"]);
    }

    #[test]
    fn test_substring_tolerance() {
        let result = calculate_skills_match(&["JavaScript/TypeScript"], &["JavaScript"]);
        assert_eq!(result.matched_skills, vec!["JavaScript"]);
        assert_eq!(result.match_percentage, 100);
    }

    #[test]
    fn test_reverse_substring_tolerance() {
        // Candidate lists "SQL", job asks for "PostgreSQL"
        let result = calculate_skills_match(&["sql"], &["PostgreSQL"]);
        assert_eq!(result.matched_skills, vec!["PostgreSQL"]);
    }

    #[test]
    fn test_react_node_aws_scenario() {
        let required = split_required_skills("React, Node.js, AWS");
        let result = calculate_skills_match(&["react", "express", "docker"], &required);
        assert_eq!(result.matched_skills, vec!["React"]);
        assert_eq!(result.missing_skills, vec!["Node.js", "AWS"]);
        assert_eq!(result.total_skills, 3);
        assert_eq!(result.match_percentage, 33);
    }

    #[test]
    fn test_counts_add_up_after_trimming_empties() {
        let required = vec!["Rust", "  ", "", "Go", " Kafka "];
        let result = calculate_skills_match(&["rust", "kafka streams"], &required);
        assert_eq!(result.total_skills, 3);
        assert_eq!(
            result.matched_skills.len() + result.missing_skills.len(),
            result.total_skills
        );
        assert_eq!(result.matched_skills, vec!["Rust", "Kafka"]);
        assert_eq!(result.missing_skills, vec!["Go"]);
        assert_eq!(result.match_percentage, 67);
    }

    #[test]
    fn test_blank_candidate_skill_matches_nothing() {
        let result = calculate_skills_match(&["", "   "], &["Rust"]);
        assert_eq!(result.missing_skills, vec!["Rust"]);
        assert_eq!(result.match_percentage, 0);
    }

    #[test]
    fn test_split_required_skills_drops_empties() {
        assert_eq!(
            split_required_skills(" React ,,Node.js, "),
            vec!["React", "Node.js"]
        );
        assert!(split_required_skills("").is_empty());
    }
}
