//! Match Scoring — deterministic, explainable candidate-vs-job scorer.
//!
//! Default: `HeuristicScorer` (pure Rust, no I/O, reproducible).
//! `AppState` holds an `Arc<dyn MatchScorer>` so the handlers never name a
//! concrete backend.

use crate::models::{
    CandidateProfile, EducationRecord, ExperienceRecord, JobRequirement, MatchKey, MatchResult,
};

// ────────────────────────────────────────────────────────────────────────────
// Aggregate policy
// ────────────────────────────────────────────────────────────────────────────

pub const REQUIRED_WEIGHT: f64 = 0.4;
pub const NICE_TO_HAVE_WEIGHT: f64 = 0.2;
pub const EXPERIENCE_WEIGHT: f64 = 0.3;
pub const EDUCATION_WEIGHT: f64 = 0.1;

/// Years credited for one experience record whose duration mentions "year".
/// A placeholder: durations are not actually parsed.
pub const YEARS_PER_EXPERIENCE_ENTRY: u32 = 1;

/// The four sub-scores, each in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub required: f64,
    pub nice_to_have: f64,
    pub experience: f64,
    pub education: f64,
}

impl SubScores {
    pub fn clamped(self) -> Self {
        Self {
            required: self.required.clamp(0.0, 1.0),
            nice_to_have: self.nice_to_have.clamp(0.0, 1.0),
            experience: self.experience.clamp(0.0, 1.0),
            education: self.education.clamp(0.0, 1.0),
        }
    }

    /// Weighted sum scaled to 0 – 100, truncated.
    pub fn aggregate(&self) -> u32 {
        let s = self.clamped();
        let weighted = s.required * REQUIRED_WEIGHT
            + s.nice_to_have * NICE_TO_HAVE_WEIGHT
            + s.experience * EXPERIENCE_WEIGHT
            + s.education * EDUCATION_WEIGHT;
        ((weighted * 100.0) as u32).min(100)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
pub trait MatchScorer: Send + Sync {
    fn score(&self, key: MatchKey, profile: &CandidateProfile, job: &JobRequirement)
        -> MatchResult;
}

/// Skill-overlap, experience and education heuristic with fixed weights.
pub struct HeuristicScorer;

impl MatchScorer for HeuristicScorer {
    fn score(
        &self,
        key: MatchKey,
        profile: &CandidateProfile,
        job: &JobRequirement,
    ) -> MatchResult {
        score_match(key, profile, job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn score_match(key: MatchKey, profile: &CandidateProfile, job: &JobRequirement) -> MatchResult {
    let sub = SubScores {
        required: skill_coverage(&profile.skills, &job.required_skills),
        nice_to_have: skill_coverage(&profile.skills, &job.nice_to_have_skills),
        experience: experience_match(&profile.experience, job.min_experience),
        education: education_match(&profile.education, &job.education_required),
    }
    .clamped();

    MatchResult {
        resume_id: key.resume_id,
        job_id: key.job_id,
        score: sub.aggregate(),
        required_match: sub.required,
        nice_to_have_match: sub.nice_to_have,
        experience_match: sub.experience,
        education_match: sub.education,
        ai_enhanced: false,
        ai_score: 0.0,
        ai_reasoning: String::new(),
    }
}

/// Fraction of `job_skills` matched by some candidate skill, where a match is
/// a case-insensitive substring in either direction ("Go" ~ "Golang").
/// Blank entries on either side are ignored; a requirement list with no
/// non-blank entry is fully covered.
pub fn skill_coverage(candidate_skills: &[String], job_skills: &[String]) -> f64 {
    let job_lower = normalized_skills(job_skills);
    if job_lower.is_empty() {
        return 1.0;
    }

    let candidate_lower = normalized_skills(candidate_skills);

    let matched = job_lower
        .iter()
        .filter(|job_skill| {
            candidate_lower
                .iter()
                .any(|c| c.contains(job_skill.as_str()) || job_skill.contains(c.as_str()))
        })
        .count();

    (matched as f64 / job_lower.len() as f64).clamp(0.0, 1.0)
}

fn normalized_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Credits `YEARS_PER_EXPERIENCE_ENTRY` for each record whose duration
/// mentions "year", compared against `min_years`. A zero minimum is always met.
pub fn experience_match(experience: &[ExperienceRecord], min_years: u32) -> f64 {
    let total_years: u32 = experience
        .iter()
        .filter(|e| e.duration.contains("year"))
        .map(|_| YEARS_PER_EXPERIENCE_ENTRY)
        .sum();

    if total_years >= min_years {
        return 1.0;
    }
    (total_years as f64 / min_years as f64).clamp(0.0, 1.0)
}

/// Binary: 1.0 when nothing is required or some degree contains the
/// requirement (case-insensitive), else 0.0.
pub fn education_match(education: &[EducationRecord], required: &str) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let required_lower = required.to_lowercase();
    if education
        .iter()
        .any(|e| e.degree.to_lowercase().contains(&required_lower))
    {
        1.0
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
