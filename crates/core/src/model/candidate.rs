use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern compiles"));
static CONTACT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11,15}$").expect("contact pattern compiles"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

//
// ─── FIELD ERRORS ─────────────────────────────────────────────────────────────
//

/// Form fields that identify a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateField {
    Name,
    ContactNumber,
    Email,
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    TooShort,
    InvalidFormat,
}

/// A rejected field together with the message shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: CandidateField,
    pub kind: FieldErrorKind,
}

impl FieldError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match (self.field, self.kind) {
            (CandidateField::Name, FieldErrorKind::Required) => "Full name is required",
            (CandidateField::Name, FieldErrorKind::TooShort) => {
                "Name must be at least 2 characters"
            }
            (CandidateField::Name, FieldErrorKind::InvalidFormat) => {
                "Name can only contain letters, spaces, hyphens, and apostrophes"
            }
            (CandidateField::ContactNumber, FieldErrorKind::Required) => {
                "WhatsApp number is required"
            }
            (CandidateField::ContactNumber, _) => {
                "Please enter a valid phone number (11-15 digits)"
            }
            (CandidateField::Email, FieldErrorKind::Required) => "Email address is required",
            (CandidateField::Email, _) => "Please enter a valid email address",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One or more candidate fields failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid candidate details: {}", summarize(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::message)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error for a specific field, if it failed.
    #[must_use]
    pub fn for_field(&self, field: CandidateField) -> Option<&FieldError> {
        self.errors.iter().find(|err| err.field == field)
    }
}

/// Validate a full name after trimming.
///
/// # Errors
///
/// Returns `FieldError` when the name is empty, shorter than two characters,
/// or contains anything other than letters, whitespace, hyphens, and apostrophes.
pub fn validate_name(raw: &str) -> Result<(), FieldError> {
    let name = raw.trim();
    let kind = if name.is_empty() {
        FieldErrorKind::Required
    } else if name.chars().count() < 2 {
        FieldErrorKind::TooShort
    } else if !NAME_PATTERN.is_match(name) {
        FieldErrorKind::InvalidFormat
    } else {
        return Ok(());
    };
    Err(FieldError {
        field: CandidateField::Name,
        kind,
    })
}

/// Validate a contact number: 11 to 15 ASCII digits after trimming.
///
/// # Errors
///
/// Returns `FieldError` when empty or not 11-15 digits.
pub fn validate_contact_number(raw: &str) -> Result<(), FieldError> {
    let number = raw.trim();
    let kind = if number.is_empty() {
        FieldErrorKind::Required
    } else if !CONTACT_PATTERN.is_match(number) {
        FieldErrorKind::InvalidFormat
    } else {
        return Ok(());
    };
    Err(FieldError {
        field: CandidateField::ContactNumber,
        kind,
    })
}

/// Validate an email address of the shape `local@domain.tld` after trimming.
///
/// # Errors
///
/// Returns `FieldError` when empty or not shaped like an address.
pub fn validate_email(raw: &str) -> Result<(), FieldError> {
    let email = raw.trim();
    let kind = if email.is_empty() {
        FieldErrorKind::Required
    } else if !EMAIL_PATTERN.is_match(email) {
        FieldErrorKind::InvalidFormat
    } else {
        return Ok(());
    };
    Err(FieldError {
        field: CandidateField::Email,
        kind,
    })
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Unvalidated candidate details as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateDraft {
    pub name: String,
    pub email: String,
    pub contact_number: String,
}

impl CandidateDraft {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        contact_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            contact_number: contact_number.into(),
        }
    }

    /// Per-field validation results in form order. Every field is checked.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        [
            validate_name(&self.name),
            validate_contact_number(&self.contact_number),
            validate_email(&self.email),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validate every field and build a `Candidate` from the trimmed values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing each field that failed.
    pub fn validate(self) -> Result<Candidate, ValidationError> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }
        Ok(Candidate {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            contact_number: self.contact_number.trim().to_owned(),
        })
    }
}

//
// ─── CANDIDATE ────────────────────────────────────────────────────────────────
//

/// Validated identity of the person taking the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    name: String,
    email: String,
    contact_number: String,
}

impl Candidate {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    /// Back to editable form values, e.g. to pre-fill the form.
    #[must_use]
    pub fn to_draft(&self) -> CandidateDraft {
        CandidateDraft::new(&self.name, &self.email, &self.contact_number)
    }
}
