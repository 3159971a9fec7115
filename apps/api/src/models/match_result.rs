use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a match: one resume scored against one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub resume_id: Uuid,
    pub job_id: Uuid,
}

impl MatchKey {
    pub fn new(resume_id: Uuid, job_id: Uuid) -> Self {
        Self { resume_id, job_id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    /// 0 – 100
    pub score: u32,
    pub required_match: f64,
    pub nice_to_have_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub ai_enhanced: bool,
    /// 0 when enhancement was not applied.
    pub ai_score: f64,
    /// Empty when enhancement was not applied.
    pub ai_reasoning: String,
}

impl MatchResult {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.resume_id, self.job_id)
    }
}
