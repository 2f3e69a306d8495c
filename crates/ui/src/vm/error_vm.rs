use services::{LoadError, ShareTarget};

/// Content of the error dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorModalVm {
    pub message: String,
    /// Text the candidate can copy when sharing failed.
    pub fallback_text: Option<String>,
}

impl ErrorModalVm {
    #[must_use]
    pub fn load_failure(err: &LoadError) -> Self {
        Self {
            message: err.user_message().to_string(),
            fallback_text: None,
        }
    }

    #[must_use]
    pub fn share_fallback(summary: String, target: &ShareTarget) -> Self {
        let message = match target.recipient() {
            Some(recipient) => format!(
                "Unable to open WhatsApp automatically. Please copy the message below and send it manually to {recipient}."
            ),
            None => "Unable to open WhatsApp automatically. Please copy the message below and send it manually.".to_string(),
        };
        Self {
            message,
            fallback_text: Some(summary),
        }
    }
}
