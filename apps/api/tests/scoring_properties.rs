//! Property-based tests for match scoring.
//!
//! - coverage stays in [0, 1]; an empty requirement list is fully covered
//! - more candidate skills never lower coverage
//! - the aggregate stays in [0, 100] and is monotone in every sub-score
//! - scoring is a pure function of its inputs

use proptest::prelude::*;
use uuid::Uuid;

use screener::matching::enhancement::blend;
use screener::matching::scorer::{score_match, skill_coverage, SubScores};
use screener::models::{CandidateProfile, JobRequirement, MatchKey};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_skill() -> impl Strategy<Value = String> {
    "[A-Za-z+#.]{1,10}"
}

fn arb_skills() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_skill(), 0..8)
}

fn arb_unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0f64
}

fn arb_sub_scores() -> impl Strategy<Value = SubScores> {
    (arb_unit(), arb_unit(), arb_unit(), arb_unit()).prop_map(
        |(required, nice_to_have, experience, education)| SubScores {
            required,
            nice_to_have,
            experience,
            education,
        },
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn coverage_is_a_fraction(candidate in arb_skills(), job in arb_skills()) {
        let coverage = skill_coverage(&candidate, &job);
        prop_assert!((0.0..=1.0).contains(&coverage));
    }

    #[test]
    fn empty_requirements_are_fully_covered(candidate in arb_skills()) {
        prop_assert_eq!(skill_coverage(&candidate, &[]), 1.0);
    }

    #[test]
    fn extra_candidate_skills_never_lower_coverage(
        candidate in arb_skills(),
        extra in arb_skill(),
        job in arb_skills(),
    ) {
        let before = skill_coverage(&candidate, &job);
        let mut widened = candidate.clone();
        widened.push(extra);
        prop_assert!(skill_coverage(&widened, &job) >= before);
    }

    #[test]
    fn aggregate_stays_in_range(sub in arb_sub_scores()) {
        prop_assert!(sub.aggregate() <= 100);
    }

    #[test]
    fn aggregate_is_monotone(sub in arb_sub_scores(), bump in arb_unit(), which in 0usize..4) {
        let mut raised = sub;
        match which {
            0 => raised.required = (sub.required + bump).min(1.0),
            1 => raised.nice_to_have = (sub.nice_to_have + bump).min(1.0),
            2 => raised.experience = (sub.experience + bump).min(1.0),
            _ => raised.education = (sub.education + bump).min(1.0),
        }
        prop_assert!(raised.aggregate() >= sub.aggregate());
    }

    #[test]
    fn blend_stays_in_range(base in 0u32..=100, enhancement in 0.0f64..=100.0) {
        prop_assert!(blend(base, enhancement) <= 100);
    }

    #[test]
    fn scoring_is_deterministic(
        skills in arb_skills(),
        required in arb_skills(),
        nice in arb_skills(),
        min_experience in 0u32..15,
    ) {
        let profile = CandidateProfile { skills, ..Default::default() };
        let job = JobRequirement {
            required_skills: required,
            nice_to_have_skills: nice,
            min_experience,
            ..Default::default()
        };
        let key = MatchKey::new(Uuid::from_u128(1), Uuid::from_u128(2));

        let first = score_match(key, &profile, &job);
        let second = score_match(key, &profile, &job);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.score <= 100);
    }
}
