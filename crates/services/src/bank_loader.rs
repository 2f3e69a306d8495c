use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::sync::OnceCell;
use url::Url;

use quiz_core::QuizRules;
use quiz_core::model::QuestionBank;

use crate::error::LoadError;

/// Where the question document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    Url(Url),
    File(PathBuf),
}

impl BankSource {
    /// Interpret `raw` as an `http(s)` URL, or as a file path otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            if let Ok(url) = Url::parse(trimmed) {
                return Self::Url(url);
            }
        }
        Self::File(PathBuf::from(trimmed))
    }
}

/// Fetches, validates and caches the question bank.
///
/// The first successful load is kept for the lifetime of the loader; later
/// calls return it without touching the source. Concurrent first calls share
/// a single fetch.
pub struct QuestionBankLoader {
    client: Client,
    source: BankSource,
    timeout: Duration,
    per_subject: usize,
    cache: OnceCell<Arc<QuestionBank>>,
}

impl QuestionBankLoader {
    #[must_use]
    pub fn new(source: BankSource, rules: &QuizRules) -> Self {
        Self {
            client: Client::new(),
            source,
            timeout: rules.fetch_timeout(),
            per_subject: rules.bank_questions_per_subject(),
            cache: OnceCell::new(),
        }
    }

    /// The bank if it has already been loaded.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<QuestionBank>> {
        self.cache.get().cloned()
    }

    /// Load the bank, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source cannot be reached or read within the
    /// timeout, answers with a non-success status, or holds an invalid document.
    /// A failed load is not cached; the next call tries again.
    pub async fn load(&self) -> Result<Arc<QuestionBank>, LoadError> {
        self.cache
            .get_or_try_init(|| self.fetch())
            .await
            .map(Arc::clone)
    }

    async fn fetch(&self) -> Result<Arc<QuestionBank>, LoadError> {
        let started = Instant::now();
        let result = async {
            let document = tokio::time::timeout(self.timeout, self.read_document())
                .await
                .map_err(|_| LoadError::Timeout(self.timeout))??;
            Ok(QuestionBank::from_json(&document, self.per_subject)?)
        }
        .await;

        match result {
            Ok(bank) => {
                tracing::debug!(
                    source = ?self.source,
                    questions = bank.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "quiz data loaded"
                );
                Ok(Arc::new(bank))
            }
            Err(err) => {
                tracing::warn!(source = ?self.source, error = %err, "failed to load quiz data");
                Err(err)
            }
        }
    }

    async fn read_document(&self) -> Result<String, LoadError> {
        match &self.source {
            BankSource::Url(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .header(ACCEPT, "application/json")
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(LoadError::HttpStatus(response.status()));
                }
                Ok(response.text().await?)
            }
            BankSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }
}
