use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::candidate::{Candidate, CandidateDraft};
use crate::model::subject::Subject;

/// Identity fields as stored in a snapshot.
///
/// Kept separate from `Candidate` so a stored entry is never trusted as validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCandidate {
    pub name: String,
    pub email: String,
    pub contact_number: String,
}

impl From<&Candidate> for SnapshotCandidate {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name().to_owned(),
            email: candidate.email().to_owned(),
            contact_number: candidate.contact_number().to_owned(),
        }
    }
}

/// Serialized progress of a quiz run, written to local storage.
///
/// Answers are keyed by the question id's string form; times are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub candidate: SnapshotCandidate,
    pub current_subject_index: usize,
    pub current_question_index: usize,
    pub answers: BTreeMap<Subject, BTreeMap<String, u8>>,
    pub scores: BTreeMap<Subject, u8>,
    pub times: BTreeMap<Subject, u64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    /// Snapshot holding only the candidate, with every subject zeroed.
    #[must_use]
    pub fn identity_only(candidate: &Candidate, saved_at: DateTime<Utc>) -> Self {
        Self {
            candidate: SnapshotCandidate::from(candidate),
            current_subject_index: 0,
            current_question_index: 0,
            answers: Subject::ALL.into_iter().map(|s| (s, BTreeMap::new())).collect(),
            scores: Subject::ALL.into_iter().map(|s| (s, 0)).collect(),
            times: Subject::ALL.into_iter().map(|s| (s, 0)).collect(),
            saved_at,
        }
    }

    /// Whether the snapshot is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.saved_at < ttl
    }

    /// Form values to pre-fill from this snapshot.
    #[must_use]
    pub fn candidate_draft(&self) -> CandidateDraft {
        CandidateDraft::new(
            &self.candidate.name,
            &self.candidate.email,
            &self.candidate.contact_number,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn snapshot(saved_at: DateTime<Utc>) -> ProgressSnapshot {
        let mut answers = BTreeMap::new();
        answers.insert(
            Subject::Html,
            BTreeMap::from([("html-1".to_string(), 2_u8)]),
        );
        ProgressSnapshot {
            candidate: SnapshotCandidate {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                contact_number: "09123456789".into(),
            },
            current_subject_index: 0,
            current_question_index: 3,
            answers,
            scores: BTreeMap::new(),
            times: BTreeMap::new(),
            saved_at,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys_and_millis() {
        let json = serde_json::to_value(snapshot(fixed_now())).unwrap();
        assert_eq!(json["currentQuestionIndex"], 3);
        assert_eq!(json["candidate"]["contactNumber"], "09123456789");
        assert_eq!(json["answers"]["HTML"]["html-1"], 2);
        assert_eq!(json["savedAt"], 1_700_000_000_000_i64);
    }

    #[test]
    fn freshness_uses_ttl() {
        let now = fixed_now();
        let ttl = Duration::hours(24);
        assert!(snapshot(now - Duration::hours(23)).is_fresh(now, ttl));
        assert!(!snapshot(now - Duration::hours(24)).is_fresh(now, ttl));
        assert!(!snapshot(now - Duration::hours(25)).is_fresh(now, ttl));
    }

    #[test]
    fn identity_only_zeroes_every_subject() {
        let candidate = CandidateDraft::new("Ada Lovelace", "ada@example.com", "09123456789")
            .validate()
            .unwrap();
        let snap = ProgressSnapshot::identity_only(&candidate, fixed_now());
        assert_eq!(snap.candidate.name, "Ada Lovelace");
        assert_eq!(snap.scores.len(), 3);
        assert!(snap.answers.values().all(BTreeMap::is_empty));
        assert!(snap.times.values().all(|ms| *ms == 0));
    }

    #[test]
    fn candidate_draft_copies_identity() {
        let draft = snapshot(fixed_now()).candidate_draft();
        assert_eq!(draft.name, "Ada Lovelace");
        assert_eq!(draft.contact_number, "09123456789");
    }
}
