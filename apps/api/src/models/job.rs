use serde::{Deserialize, Serialize};

/// A job posting's requirements, already loaded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    /// In years.
    #[serde(default)]
    pub min_experience: u32,
    /// Empty means no requirement.
    #[serde(default)]
    pub education_required: String,
    /// e.g. "entry", "mid", "senior"
    #[serde(default)]
    pub experience_level: String,
}
