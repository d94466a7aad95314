//! Ranking of many candidates against one job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::parse::ParsedCandidate;
use crate::matching::scoring::{combine_scores, ProfileScorer, RankingWeights, SubScores};
use crate::matching::skills::{calculate_skills_match, split_required_skills, SkillsMatch};
use crate::models::job::JobRequirements;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRanking {
    pub candidate_id: Uuid,
    pub overall_score: u32, // 0 – 100
    pub skills_match: SkillsMatch,
    pub experience_score: u32,
    pub education_score: u32,
    pub location_score: u32,
    pub summary: String,
}

/// Scores every candidate against `job` and returns the rankings sorted by
/// overall score, highest first. Candidates with equal scores keep their
/// input order.
pub fn sort_candidates_by_ranking(
    candidates: &[ParsedCandidate],
    job: &JobRequirements,
    scorer: &dyn ProfileScorer,
    weights: &RankingWeights,
) -> Vec<CandidateRanking> {
    let required_skills = split_required_skills(&job.required_skills);

    let mut rankings: Vec<CandidateRanking> = candidates
        .iter()
        .map(|candidate| rank_candidate(candidate, job, &required_skills, scorer, weights))
        .collect();

    // `sort_by` is stable: ties stay in input order.
    rankings.sort_by(|a, b| b.overall_score.cmp(&a.overall_score));
    rankings
}

/// Keeps rankings scoring at least `min_score`, then truncates to `limit`.
/// Input is expected to be sorted already.
pub fn select_top(
    rankings: Vec<CandidateRanking>,
    min_score: u32,
    limit: usize,
) -> Vec<CandidateRanking> {
    rankings
        .into_iter()
        .filter(|r| r.overall_score >= min_score)
        .take(limit)
        .collect()
}

fn rank_candidate(
    candidate: &ParsedCandidate,
    job: &JobRequirements,
    required_skills: &[String],
    scorer: &dyn ProfileScorer,
    weights: &RankingWeights,
) -> CandidateRanking {
    let skills_match = calculate_skills_match(&candidate.profile.skills, required_skills);

    let scores = SubScores {
        skills: skills_match.match_percentage,
        experience: scorer.experience_score(candidate, job).min(100),
        education: scorer.education_score(candidate, job).min(100),
        location: scorer.location_score(candidate, job).min(100),
    };
    let overall_score = combine_scores(&scores, weights);
    let summary = build_summary(overall_score, &skills_match);

    CandidateRanking {
        candidate_id: candidate.id,
        overall_score,
        skills_match,
        experience_score: scores.experience,
        education_score: scores.education,
        location_score: scores.location,
        summary,
    }
}

/// Human-readable one-liner for recruiters.
fn build_summary(score: u32, skills: &SkillsMatch) -> String {
    let coverage = if skills.total_skills == 0 {
        "no required skills listed".to_string()
    } else {
        format!(
            "{}/{} required skills ({}%)",
            skills.matched_skills.len(),
            skills.total_skills,
            skills.match_percentage
        )
    };
    let top_missing: Vec<&str> = skills
        .missing_skills
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();

    let verdict = if score >= 80 {
        "Strong match"
    } else if score >= 60 {
        "Good match"
    } else if score >= 40 {
        "Partial match"
    } else {
        "Weak match"
    };

    if top_missing.is_empty() {
        format!("{verdict} ({score}/100): {coverage}.")
    } else {
        format!(
            "{verdict} ({score}/100): {coverage}. Missing: {}.",
            top_missing.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scoring::HeuristicProfileScorer;
    use crate::models::candidate::CandidateProfile;
    use chrono::Utc;

    /// Scores every dimension with a fixed value so ordering is driven by skills only.
    struct FlatScorer(u32);

    impl ProfileScorer for FlatScorer {
        fn name(&self) -> &'static str {
            "flat"
        }
        fn experience_score(&self, _: &ParsedCandidate, _: &JobRequirements) -> u32 {
            self.0
        }
        fn education_score(&self, _: &ParsedCandidate, _: &JobRequirements) -> u32 {
            self.0
        }
        fn location_score(&self, _: &ParsedCandidate, _: &JobRequirements) -> u32 {
            self.0
        }
    }

    fn make_candidate(skills: &[&str]) -> ParsedCandidate {
        ParsedCandidate {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            name: "Candidate".to_string(),
            email: "c@example.com".to_string(),
            phone: None,
            profile_url: None,
            status: "new".to_string(),
            location: None,
            summary: None,
            profile: CandidateProfile {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_job(required_skills: &str) -> JobRequirements {
        JobRequirements {
            title: "Engineer".to_string(),
            required_skills: required_skills.to_string(),
            ..Default::default()
        }
    }

    fn make_ranking(score: u32) -> CandidateRanking {
        CandidateRanking {
            candidate_id: Uuid::new_v4(),
            overall_score: score,
            skills_match: calculate_skills_match::<&str, &str>(&[], &[]),
            experience_score: 0,
            education_score: 0,
            location_score: 0,
            summary: String::new(),
        }
    }

    #[test]
    fn test_sorted_descending_by_overall_score() {
        let candidates = vec![
            make_candidate(&["rust"]),
            make_candidate(&["rust", "sql", "kafka"]),
            make_candidate(&[]),
            make_candidate(&["rust", "sql"]),
        ];
        let rankings = sort_candidates_by_ranking(
            &candidates,
            &make_job("Rust, SQL, Kafka"),
            &FlatScorer(50),
            &RankingWeights::default(),
        );
        let scores: Vec<u32> = rankings.iter().map(|r| r.overall_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
        assert_eq!(rankings[0].candidate_id, candidates[1].id);
        assert_eq!(rankings[3].candidate_id, candidates[2].id);
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let candidates = vec![
            make_candidate(&["go"]),
            make_candidate(&["rust"]),
            make_candidate(&["python"]),
            make_candidate(&["RUST"]),
        ];
        let rankings = sort_candidates_by_ranking(
            &candidates,
            &make_job("Rust"),
            &FlatScorer(40),
            &RankingWeights::default(),
        );
        let order: Vec<Uuid> = rankings.iter().map(|r| r.candidate_id).collect();
        assert_eq!(
            order,
            vec![candidates[1].id, candidates[3].id, candidates[0].id, candidates[2].id]
        );
    }

    #[test]
    fn test_scores_within_bounds_with_default_scorer() {
        let candidates = vec![make_candidate(&["rust", "sql"]), make_candidate(&[])];
        let rankings = sort_candidates_by_ranking(
            &candidates,
            &make_job("Rust, SQL"),
            &HeuristicProfileScorer::default(),
            &RankingWeights::default(),
        );
        for r in &rankings {
            assert!(r.overall_score <= 100);
            assert!(r.experience_score <= 100);
            assert!(r.education_score <= 100);
            assert!(r.location_score <= 100);
        }
    }

    #[test]
    fn test_out_of_range_scorer_is_clamped() {
        let rankings = sort_candidates_by_ranking(
            &[make_candidate(&["rust"])],
            &make_job("Rust"),
            &FlatScorer(500),
            &RankingWeights::default(),
        );
        assert_eq!(rankings[0].experience_score, 100);
        assert_eq!(rankings[0].overall_score, 100);
    }

    #[test]
    fn test_empty_candidate_list() {
        let rankings = sort_candidates_by_ranking(
            &[],
            &make_job("Rust"),
            &FlatScorer(50),
            &RankingWeights::default(),
        );
        assert!(rankings.is_empty());
    }

    #[test]
    fn test_filter_then_limit() {
        let rankings = vec![make_ranking(90), make_ranking(85), make_ranking(70), make_ranking(60)];
        let selected = select_top(rankings, 70, 2);
        let scores: Vec<u32> = selected.iter().map(|r| r.overall_score).collect();
        assert_eq!(scores, vec![90, 85]);
    }

    #[test]
    fn test_filter_drops_below_threshold_before_limit() {
        let rankings = vec![make_ranking(90), make_ranking(65), make_ranking(60)];
        let selected = select_top(rankings, 70, 5);
        let scores: Vec<u32> = selected.iter().map(|r| r.overall_score).collect();
        assert_eq!(scores, vec![90]);
    }

    #[test]
    fn test_summary_lists_missing_skills() {
        let skills = calculate_skills_match(&["react"], &["React", "Node.js", "AWS"]);
        let summary = build_summary(45, &skills);
        assert!(summary.starts_with("Partial match"));
        assert!(summary.contains("1/3"));
        assert!(summary.contains("Node.js, AWS"));
    }

    #[test]
    fn test_summary_without_required_skills() {
        let skills = calculate_skills_match::<&str, &str>(&[], &[]);
        let summary = build_summary(85, &skills);
        assert!(summary.contains("Strong match"));
        assert!(summary.contains("no required skills listed"));
    }
}
