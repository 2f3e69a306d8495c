use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use quiz_core::model::{Question, QuestionBank, Subject};

/// Draws a subject's questions without replacement.
///
/// Backed by an injectable random source. The default source is seeded from
/// the operating system; when that fails it falls back to a time seed.
pub struct QuestionSelector {
    rng: Box<dyn RngCore + Send>,
}

impl QuestionSelector {
    #[must_use]
    pub fn from_os_entropy() -> Self {
        match StdRng::try_from_os_rng() {
            Ok(rng) => Self::with_rng(rng),
            Err(err) => {
                tracing::warn!(error = %err, "os random source unavailable, seeding from time");
                Self::seeded(time_seed())
            }
        }
    }

    /// Deterministic selector for tests and reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Shuffle the subject's pool and keep the first `count` questions.
    pub fn select(&mut self, bank: &QuestionBank, subject: Subject, count: usize) -> Vec<Question> {
        let mut pool = bank.questions(subject).to_vec();
        pool.shuffle(&mut *self.rng);
        pool.truncate(count);
        pool
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::from_os_entropy()
    }
}

impl std::fmt::Debug for QuestionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionSelector").finish_non_exhaustive()
    }
}

fn time_seed() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or_default()
}
