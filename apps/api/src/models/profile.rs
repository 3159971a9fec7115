use serde::{Deserialize, Serialize};

/// Structured facts recovered from a resume's text.
///
/// Produced once by fact extraction; afterwards only the skill list may
/// change, through the AI skill merge at upload time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Display case. Compared case-insensitively.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub experience: Vec<ExperienceRecord>,
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    /// 0 when unknown.
    #[serde(default)]
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    /// Free text, e.g. "2 years".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

impl CandidateProfile {
    /// Replaces the skill list with the case-insensitive union of the current
    /// skills and `extracted`.
    pub fn merge_skills(&mut self, extracted: &[String]) {
        self.skills = crate::matching::enhancement::merge_skills(&self.skills, extracted);
    }
}
