//! Sub-scores for a candidate against a job — pluggable, trait-based.
//!
//! Default: `HeuristicProfileScorer` (keyword and length heuristics over the
//! decoded profile). Every scorer must return values in [0, 100]; only that
//! range and the weighting in `combine_scores` are relied on by ranking.
//!
//! `AppState` holds an `Arc<dyn ProfileScorer>`, chosen at startup.

use serde::{Deserialize, Serialize};

use crate::matching::parse::ParsedCandidate;
use crate::models::job::JobRequirements;

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub location: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.2,
            education: 0.2,
            location: 0.2,
        }
    }
}

/// Per-dimension scores for one candidate, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub location: u32,
}

/// Weighted mean of the sub-scores, rounded and clamped to [0, 100].
/// Weights are normalized, so they need not sum to 1. All-zero weights give 0.
pub fn combine_scores(scores: &SubScores, weights: &RankingWeights) -> u32 {
    let total_weight = weights.skills + weights.experience + weights.education + weights.location;
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted = weights.skills * scores.skills as f64
        + weights.experience * scores.experience as f64
        + weights.education * scores.education as f64
        + weights.location * scores.location as f64;
    (weighted / total_weight).round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring strategies without touching ranking or
/// handler code. Returned values are clamped by callers, but implementations
/// should already stay within [0, 100].
pub trait ProfileScorer: Send + Sync {
    /// Short label reported alongside rankings.
    fn name(&self) -> &'static str;

    fn experience_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32;

    fn education_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32;

    fn location_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicProfileScorer
// ────────────────────────────────────────────────────────────────────────────

/// Tunable thresholds for `HeuristicProfileScorer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicThresholds {
    /// Points per work-history entry, before the cap.
    pub points_per_role: u32,
    pub max_role_points: u32,
    /// Description length (chars) that earns the full description bonus.
    pub rich_description_chars: usize,
    pub description_points: u32,
    pub summary_points: u32,
    pub project_points: u32,
    /// Extra points when a role's position mentions the job title.
    pub title_overlap_points: u32,
    pub certification_points: u32,
    pub location_match: u32,
    pub location_remote: u32,
    pub location_unknown: u32,
    pub location_mismatch: u32,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            points_per_role: 15,
            max_role_points: 45,
            rich_description_chars: 200,
            description_points: 20,
            summary_points: 10,
            project_points: 10,
            title_overlap_points: 15,
            certification_points: 10,
            location_match: 100,
            location_remote: 80,
            location_unknown: 50,
            location_mismatch: 20,
        }
    }
}

/// Degree levels recognized in education and qualification text, highest first.
const DEGREE_LEVELS: &[(&[&str], u32)] = &[
    (&["phd", "ph.d", "doctorate", "doctor of"], 100),
    (&["master", "msc", "m.sc", "mba", "m.s.", "meng"], 85),
    (&["bachelor", "bsc", "b.sc", "b.s.", "ba ", "b.a.", "beng", "btech", "b.tech"], 70),
    (&["associate", "diploma"], 50),
];

#[derive(Debug, Clone, Default)]
pub struct HeuristicProfileScorer {
    pub thresholds: HeuristicThresholds,
}

impl HeuristicProfileScorer {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }
}

impl ProfileScorer for HeuristicProfileScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn experience_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32 {
        let t = &self.thresholds;
        let experience = &candidate.profile.experience;

        let role_points = (experience.len() as u32 * t.points_per_role).min(t.max_role_points);

        let description_chars: usize = experience
            .iter()
            .map(|e| e.description.trim().chars().count())
            .sum();
        let description_points = if t.rich_description_chars == 0 {
            t.description_points
        } else {
            let ratio = (description_chars as f64 / t.rich_description_chars as f64).min(1.0);
            (ratio * t.description_points as f64).round() as u32
        };

        let summary_points = match candidate.summary.as_deref() {
            Some(s) if !s.trim().is_empty() => t.summary_points,
            _ => 0,
        };

        let project_points = if candidate.profile.projects.is_empty() {
            0
        } else {
            t.project_points
        };

        let title = job.title.trim().to_lowercase();
        let title_points = if !title.is_empty()
            && experience.iter().any(|e| {
                let position = e.position.trim().to_lowercase();
                !position.is_empty() && (position.contains(&title) || title.contains(&position))
            }) {
            t.title_overlap_points
        } else {
            0
        };

        (role_points + description_points + summary_points + project_points + title_points)
            .min(100)
    }

    fn education_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32 {
        let t = &self.thresholds;
        let certification_points = if candidate.profile.certifications.is_empty() {
            0
        } else {
            t.certification_points
        };

        let Some(education) = candidate.profile.education.as_ref() else {
            return certification_points.min(100);
        };

        let degree_text = format!(" {} ", education.degree.to_lowercase());
        let candidate_level = degree_level(&degree_text);
        let mut score = match candidate_level {
            Some(level) => level,
            None if !education.degree.trim().is_empty() => 40,
            None => 30,
        };

        if let Some(qualifications) = job.qualifications.as_deref() {
            let wanted = format!(" {} ", qualifications.to_lowercase());
            if let (Some(have), Some(need)) = (candidate_level, degree_level(&wanted)) {
                if have >= need {
                    score += 15;
                }
            }
            if let Some(field) = education.field.as_deref() {
                let field = field.trim().to_lowercase();
                if !field.is_empty() && wanted.contains(&field) {
                    score += 10;
                }
            }
        }

        (score + certification_points).min(100)
    }

    fn location_score(&self, candidate: &ParsedCandidate, job: &JobRequirements) -> u32 {
        let t = &self.thresholds;
        let candidate_location = candidate
            .location
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let job_location = job
            .location
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let score = match (candidate_location, job_location) {
            (Some(have), Some(want)) => {
                if have.contains(&want) || want.contains(&have) {
                    t.location_match
                } else if have.contains("remote") || want.contains("remote") {
                    t.location_remote
                } else {
                    t.location_mismatch
                }
            }
            _ => t.location_unknown,
        };
        score.min(100)
    }
}

fn degree_level(text: &str) -> Option<u32> {
    DEGREE_LEVELS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, level)| *level)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
