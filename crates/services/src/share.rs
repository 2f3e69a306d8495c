use std::fmt::Write as _;

use url::Url;

use quiz_core::time::format_clock;

use crate::error::ShareError;
use crate::sessions::FinalResults;

const SHARE_BASE: &str = "https://wa.me/";

/// Plain-text results summary sent to the examiner.
#[must_use]
pub fn summary_message(results: &FinalResults) -> String {
    let candidate = &results.candidate;
    let mut message = format!(
        "Student: {}\nEmail: {}\nWhatsApp: {}\n",
        candidate.name(),
        candidate.email(),
        candidate.contact_number()
    );
    for row in &results.subjects {
        let _ = writeln!(
            message,
            "Score {}: {}/{} ({})",
            row.subject.key(),
            row.score,
            row.out_of,
            format_clock(row.elapsed)
        );
    }
    let _ = write!(
        message,
        "Total Score: {}/{}\nTotal Time: {}",
        results.total_score(),
        results.max_score(),
        format_clock(results.total_time())
    );
    message
}

/// Recipient of the results deep link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareTarget {
    recipient: Option<String>,
}

impl ShareTarget {
    /// Build a target from a phone number; blank means "let the user pick".
    ///
    /// # Errors
    ///
    /// Returns `ShareError::InvalidRecipient` if the number holds anything but
    /// ASCII digits.
    pub fn new(recipient: Option<&str>) -> Result<Self, ShareError> {
        let recipient = recipient.map(str::trim).filter(|r| !r.is_empty());
        if let Some(raw) = recipient {
            if !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(ShareError::InvalidRecipient(raw.to_owned()));
            }
        }
        Ok(Self {
            recipient: recipient.map(str::to_owned),
        })
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    /// Deep link opening a chat with `message` pre-filled.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Link` if the URL cannot be assembled.
    pub fn deep_link(&self, message: &str) -> Result<Url, ShareError> {
        let base = format!("{SHARE_BASE}{}", self.recipient.as_deref().unwrap_or_default());
        let mut url = Url::parse(&base).map_err(|err| ShareError::Link(err.to_string()))?;
        url.query_pairs_mut().append_pair("text", message);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use quiz_core::model::{CandidateDraft, Subject};

    use super::*;
    use crate::sessions::SubjectResult;

    fn results() -> FinalResults {
        let candidate = CandidateDraft::new("Ada Lovelace", "ada@example.com", "09123456789")
            .validate()
            .unwrap();
        let row = |subject, score, secs| SubjectResult {
            subject,
            score,
            out_of: 10,
            elapsed: Duration::seconds(secs),
            auto_submitted: false,
        };
        FinalResults {
            candidate,
            subjects: vec![
                row(Subject::Html, 10, 83),
                row(Subject::Css, 0, 300),
                row(Subject::Js, 0, 61),
            ],
        }
    }

    #[test]
    fn summary_lists_identity_scores_and_totals() {
        let message = summary_message(&results());
        assert_eq!(
            message,
            "Student: Ada Lovelace\n\
             Email: ada@example.com\n\
             WhatsApp: 09123456789\n\
             Score HTML: 10/10 (01:23)\n\
             Score CSS: 0/10 (05:00)\n\
             Score JS: 0/10 (01:01)\n\
             Total Score: 10/30\n\
             Total Time: 07:24"
        );
    }

    #[test]
    fn deep_link_targets_recipient_and_encodes_text() {
        let target = ShareTarget::new(Some("989123456789")).unwrap();
        let message = summary_message(&results());
        let link = target.deep_link(&message).unwrap();

        assert!(link.as_str().starts_with("https://wa.me/989123456789?text="));
        assert!(!link.as_str().contains('\n'));
        let text = link
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned());
        assert_eq!(text.as_deref(), Some(message.as_str()));
    }

    #[test]
    fn deep_link_without_recipient() {
        let link = ShareTarget::new(None).unwrap().deep_link("hi there").unwrap();
        assert!(link.as_str().starts_with("https://wa.me/?text="));

        let blank = ShareTarget::new(Some("  ")).unwrap();
        assert_eq!(blank.recipient(), None);
    }

    #[test]
    fn recipient_must_be_digits() {
        assert_eq!(
            ShareTarget::new(Some("+98 912")),
            Err(ShareError::InvalidRecipient("+98 912".into()))
        );
    }
}
