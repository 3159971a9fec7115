pub mod job;
pub mod match_result;
pub mod profile;

pub use job::JobRequirement;
pub use match_result::{MatchKey, MatchResult};
pub use profile::{CandidateProfile, EducationRecord, ExperienceRecord};
