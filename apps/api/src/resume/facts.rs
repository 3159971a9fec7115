//! Fact extraction — pattern-based recovery of candidate attributes from
//! resume text. Never fails: a missing signal leaves its field empty.
//!
//! Known limitation: the name heuristic takes the first short, letters-only
//! line, so a section header such as "Curriculum Vitae" at the top of a
//! resume is reported as the name.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::CandidateProfile;
use crate::resume::vocabulary::match_skills;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?[0-9]{1,3}[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("valid phone pattern")
});

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s.]+$").expect("valid name pattern"));

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;

/// Builds a profile from plain resume text. Education and experience records
/// are not parsed from free text and stay empty.
pub fn extract_profile(text: &str) -> CandidateProfile {
    CandidateProfile {
        candidate_name: extract_name(text).unwrap_or_default(),
        email: extract_email(text).unwrap_or_default(),
        phone: extract_phone(text).unwrap_or_default(),
        skills: match_skills(text),
        education: Vec::new(),
        experience: Vec::new(),
        raw_text: text.to_string(),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_name(text: &str) -> Option<String> {
    text.lines().map(str::trim).find(|line| is_name_line(line)).map(String::from)
}

fn is_name_line(line: &str) -> bool {
    let chars = line.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return false;
    }
    let lower = line.to_lowercase();
    NAME_PATTERN.is_match(line)
        && !lower.contains("email")
        && !lower.contains("phone")
        && !line.contains('@')
}
