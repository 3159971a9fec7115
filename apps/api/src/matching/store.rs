//! In-memory registry of match results, one entry per (resume, job) pair.
//! Recomputing a pair overwrites its entry.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::matching::batch::rank;
use crate::models::{MatchKey, MatchResult};

#[derive(Debug, Clone, Serialize)]
pub struct StoredMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MatchResultStore {
    entries: RwLock<HashMap<MatchKey, StoredMatch>>,
}

impl MatchResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the result for its (resume, job) pair.
    /// Returns true when an earlier result was replaced.
    pub fn upsert(&self, result: MatchResult) -> bool {
        let stored = StoredMatch {
            result,
            updated_at: Utc::now(),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(stored.result.key(), stored).is_some()
    }

    pub fn get(&self, key: &MatchKey) -> Option<StoredMatch> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Best `limit` results for `job_id`, ranked by score.
    pub fn top_for_job(&self, job_id: Uuid, limit: usize) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            entries
                .values()
                .filter(|s| s.result.job_id == job_id)
                .map(|s| s.result.clone())
                .collect()
        };
        rank(&mut results);
        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(resume_id: Uuid, job_id: Uuid, score: u32) -> MatchResult {
        MatchResult {
            resume_id,
            job_id,
            score,
            required_match: 0.5,
            nice_to_have_match: 1.0,
            experience_match: 1.0,
            education_match: 1.0,
            ai_enhanced: false,
            ai_score: 0.0,
            ai_reasoning: String::new(),
        }
    }

    #[test]
    fn test_upsert_overwrites_same_pair() {
        let store = MatchResultStore::new();
        let resume_id = Uuid::new_v4();
        let job_id = Uuid::new_v4();

        assert!(!store.upsert(result(resume_id, job_id, 40)));
        assert!(store.upsert(result(resume_id, job_id, 75)));

        assert_eq!(store.len(), 1);
        let stored = store.get(&MatchKey::new(resume_id, job_id)).unwrap();
        assert_eq!(stored.result.score, 75);
    }

    #[test]
    fn test_distinct_pairs_are_kept_apart() {
        let store = MatchResultStore::new();
        let resume_id = Uuid::new_v4();
        store.upsert(result(resume_id, Uuid::new_v4(), 10));
        store.upsert(result(resume_id, Uuid::new_v4(), 20));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_top_for_job_ranks_and_limits() {
        let store = MatchResultStore::new();
        let job_id = Uuid::new_v4();
        let other_job = Uuid::new_v4();
        for score in [30, 90, 60, 75] {
            store.upsert(result(Uuid::new_v4(), job_id, score));
        }
        store.upsert(result(Uuid::new_v4(), other_job, 100));

        let top = store.top_for_job(job_id, 3);
        let scores: Vec<u32> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![90, 75, 60]);
        assert!(top.iter().all(|r| r.job_id == job_id));
    }

    #[test]
    fn test_empty_store() {
        let store = MatchResultStore::new();
        assert!(store.is_empty());
        assert!(store.top_for_job(Uuid::new_v4(), 10).is_empty());
    }
}
