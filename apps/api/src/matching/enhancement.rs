//! Enhancement — optional semantic-matching signal blended into the heuristic
//! score.
//!
//! The external service sits behind `SemanticMatcher`, which returns the raw
//! response text. Interpretation, timeouts, cancellation and blending live
//! here so any backend (the LLM client, a test stub) behaves the same way.
//! Every failure degrades to the un-enhanced result.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::llm_client::strip_json_fences;
use crate::models::{CandidateProfile, MatchResult};
use crate::resume::vocabulary::{match_skills, title_case};

pub const BASE_WEIGHT: f64 = 0.6;
pub const ENHANCEMENT_WEIGHT: f64 = 0.4;

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)(?:/100|%)").expect("valid score pattern")
});

static EXPERIENCE_YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(?:year|yr)s?\s*(?:of\s*)?experience")
        .expect("valid experience pattern")
});

/// Highest level first; the first keyword found wins.
const EDUCATION_LEVELS: &[(&str, &str)] = &[
    ("phd", "phd"),
    ("doctorate", "phd"),
    ("doctoral", "phd"),
    ("master", "master"),
    ("bachelor", "bachelor"),
    ("associate", "associate"),
    ("diploma", "associate"),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnhancementError {
    #[error("enhancement unavailable: {0}")]
    Unavailable(String),

    #[error("enhancement returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Interpreted semantic-match response. Scores are 0 – 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub score: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub experience_match: Option<f64>,
    #[serde(default)]
    pub education_match: Option<f64>,
}

impl EnhancementResult {
    fn clamped(mut self) -> Self {
        self.score = clamp_percent(self.score);
        self.experience_match = self.experience_match.map(clamp_percent);
        self.education_match = self.education_match.map(clamp_percent);
        self
    }
}

/// Skills and signals pulled from resume text by the external service, or by
/// the manual fallback when its response is not JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillExtraction {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub education_level: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The external semantic-matching capability. Implementations return the
/// service's raw text; they never interpret it.
#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    async fn submit(&self, resume_text: &str, job_text: &str) -> Result<String, EnhancementError>;

    async fn extract_skills(&self, _text: &str) -> Result<String, EnhancementError> {
        Err(EnhancementError::Unavailable(
            "skill extraction not supported by this backend".to_string(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct EnhancementAdapter {
    matcher: Arc<dyn SemanticMatcher>,
    timeout: Duration,
}

impl EnhancementAdapter {
    pub fn new(matcher: Arc<dyn SemanticMatcher>, timeout: Duration) -> Self {
        Self { matcher, timeout }
    }

    /// Submits both texts and interprets the response, bounded by the
    /// adapter timeout and by `cancel`.
    pub async fn enhance(
        &self,
        resume_text: &str,
        job_text: &str,
        cancel: &CancellationToken,
    ) -> Result<EnhancementResult, EnhancementError> {
        let raw = self
            .bounded(cancel, self.matcher.submit(resume_text, job_text))
            .await?;
        interpret_match_response(&raw)
    }

    /// Blends the enhancement signal into `base`. On any enhancement failure
    /// `base` is returned untouched.
    pub async fn apply(
        &self,
        base: MatchResult,
        resume_text: &str,
        job_text: &str,
        cancel: &CancellationToken,
    ) -> MatchResult {
        match self.enhance(resume_text, job_text, cancel).await {
            Ok(enhancement) => {
                debug!(
                    resume_id = %base.resume_id,
                    job_id = %base.job_id,
                    base_score = base.score,
                    ai_score = enhancement.score,
                    "enhancement applied"
                );
                MatchResult {
                    score: blend(base.score, enhancement.score),
                    ai_enhanced: true,
                    ai_score: enhancement.score,
                    ai_reasoning: enhancement.reasoning,
                    ..base
                }
            }
            Err(e) => {
                warn!(
                    resume_id = %base.resume_id,
                    job_id = %base.job_id,
                    error = %e,
                    "enhancement failed, keeping base score"
                );
                base
            }
        }
    }

    /// Asks the service for skills in `text`. A non-JSON answer falls back to
    /// manual extraction over `text` itself.
    pub async fn extract_skills(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<SkillExtraction, EnhancementError> {
        let raw = self.bounded(cancel, self.matcher.extract_skills(text)).await?;
        match serde_json::from_str::<SkillExtraction>(strip_json_fences(&raw)) {
            Ok(extraction) => Ok(extraction),
            Err(e) => {
                warn!(error = %e, "skill extraction response is not JSON, using keyword fallback");
                Ok(manual_skill_extraction(text))
            }
        }
    }

    /// Merges service-extracted skills into `profile`. Returns whether the
    /// merge happened; failures leave the profile as it was.
    pub async fn augment_profile(
        &self,
        profile: &mut CandidateProfile,
        cancel: &CancellationToken,
    ) -> bool {
        match self.extract_skills(&profile.raw_text, cancel).await {
            Ok(extraction) => {
                profile.merge_skills(&extraction.skills);
                true
            }
            Err(e) => {
                warn!(error = %e, "skill extraction failed, keeping parsed skills");
                false
            }
        }
    }

    async fn bounded<F>(&self, cancel: &CancellationToken, call: F) -> Result<String, EnhancementError>
    where
        F: std::future::Future<Output = Result<String, EnhancementError>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EnhancementError::Unavailable("cancelled".to_string())),
            outcome = tokio::time::timeout(self.timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(EnhancementError::Unavailable(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                ))),
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interpretation and policy
// ────────────────────────────────────────────────────────────────────────────

/// Parses a match response as JSON; otherwise recovers a score written as
/// "N/100" or "N%" and takes every line after the first as reasoning.
pub fn interpret_match_response(raw: &str) -> Result<EnhancementResult, EnhancementError> {
    match serde_json::from_str::<EnhancementResult>(strip_json_fences(raw)) {
        Ok(result) => Ok(result.clamped()),
        Err(e) => {
            warn!(error = %e, "match response is not JSON, trying text fallback");
            parse_text_response(raw)
        }
    }
}

fn parse_text_response(raw: &str) -> Result<EnhancementResult, EnhancementError> {
    let score = SCORE_PATTERN
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| {
            EnhancementError::InvalidResponse("no score found in response text".to_string())
        })?;

    let reasoning = raw.lines().skip(1).collect::<Vec<_>>().join("\n");

    Ok(EnhancementResult {
        score: clamp_percent(score),
        reasoning,
        matched_skills: Vec::new(),
        missing_skills: Vec::new(),
        experience_match: None,
        education_match: None,
    })
}

/// `base × 0.6 + enhancement × 0.4`, truncated to 0 – 100.
pub fn blend(base_score: u32, enhancement_score: f64) -> u32 {
    let combined = f64::from(base_score.min(100)) * BASE_WEIGHT
        + clamp_percent(enhancement_score) * ENHANCEMENT_WEIGHT;
    (combined as u32).min(100)
}

/// Case-insensitive union of both lists, title-cased, first occurrence wins
/// the position.
pub fn merge_skills(candidate: &[String], extracted: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(candidate.len() + extracted.len());
    for skill in candidate.iter().chain(extracted) {
        let lower = skill.trim().to_lowercase();
        if lower.is_empty() {
            continue;
        }
        let display = title_case(&lower);
        if !merged.contains(&display) {
            merged.push(display);
        }
    }
    merged
}

/// Keyword fallback for skill extraction, using the shared vocabulary.
pub fn manual_skill_extraction(text: &str) -> SkillExtraction {
    let lower = text.to_lowercase();

    let experience_years = EXPERIENCE_YEARS_PATTERN
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0);

    let education_level = EDUCATION_LEVELS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, level)| level.to_string())
        .unwrap_or_default();

    SkillExtraction {
        skills: match_skills(text),
        experience_years,
        education_level,
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
