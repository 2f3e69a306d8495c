use quiz_core::model::{CandidateDraft, CandidateField, FieldError};

/// Background bank load as seen by the start button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadState {
    Loading,
    Ready,
    Failed,
}

/// Fields the candidate has edited; errors show only for these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchedFields {
    pub name: bool,
    pub contact_number: bool,
    pub email: bool,
}

impl TouchedFields {
    #[must_use]
    pub fn all() -> Self {
        Self {
            name: true,
            contact_number: true,
            email: true,
        }
    }

    pub fn mark(&mut self, field: CandidateField) {
        match field {
            CandidateField::Name => self.name = true,
            CandidateField::ContactNumber => self.contact_number = true,
            CandidateField::Email => self.email = true,
        }
    }

    #[must_use]
    pub fn contains(&self, field: CandidateField) -> bool {
        match field {
            CandidateField::Name => self.name,
            CandidateField::ContactNumber => self.contact_number,
            CandidateField::Email => self.email,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartButtonVm {
    pub label: &'static str,
    pub title: &'static str,
    pub class: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandingVm {
    pub name_error: Option<&'static str>,
    pub contact_error: Option<&'static str>,
    pub email_error: Option<&'static str>,
    pub start: StartButtonVm,
}

#[must_use]
pub fn map_landing(
    draft: &CandidateDraft,
    touched: TouchedFields,
    preload: PreloadState,
    starting: bool,
) -> LandingVm {
    let errors = draft.field_errors();
    let error_for = |field: CandidateField| {
        errors
            .iter()
            .find(|err| err.field == field && touched.contains(field))
            .map(FieldError::message)
    };

    let start = if starting {
        StartButtonVm {
            label: "Starting...",
            title: "Preparing your exam...",
            class: "btn btn--primary loading",
            disabled: true,
        }
    } else {
        match preload {
            PreloadState::Loading => StartButtonVm {
                label: "Loading Questions...",
                title: "Loading 30 questions (10 per subject)...",
                class: "btn btn--primary loading",
                disabled: !errors.is_empty(),
            },
            PreloadState::Ready => StartButtonVm {
                label: "Start Exam",
                title: "30 questions loaded and ready! Click to start.",
                class: "btn btn--primary ready",
                disabled: !errors.is_empty(),
            },
            PreloadState::Failed => StartButtonVm {
                label: "Start Exam",
                title: "Quiz data will load when you click start",
                class: "btn btn--primary",
                disabled: !errors.is_empty(),
            },
        }
    };

    LandingVm {
        name_error: error_for(CandidateField::Name),
        contact_error: error_for(CandidateField::ContactNumber),
        email_error: error_for(CandidateField::Email),
        start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_fields_hide_errors_but_block_start() {
        let vm = map_landing(
            &CandidateDraft::default(),
            TouchedFields::default(),
            PreloadState::Ready,
            false,
        );
        assert_eq!(vm.name_error, None);
        assert!(vm.start.disabled);
        assert_eq!(vm.start.label, "Start Exam");
    }

    #[test]
    fn blurring_one_field_reveals_only_its_error() {
        let mut touched = TouchedFields::default();
        touched.mark(CandidateField::Email);
        let vm = map_landing(
            &CandidateDraft::default(),
            touched,
            PreloadState::Ready,
            false,
        );
        assert_eq!(vm.name_error, None);
        assert_eq!(vm.email_error, Some("Email address is required"));
    }

    #[test]
    fn touched_fields_show_form_messages() {
        let draft = CandidateDraft::new("A", "ada@", "12ab");
        let vm = map_landing(&draft, TouchedFields::all(), PreloadState::Loading, false);
        assert_eq!(vm.name_error, Some("Name must be at least 2 characters"));
        assert_eq!(
            vm.contact_error,
            Some("Please enter a valid phone number (11-15 digits)")
        );
        assert_eq!(vm.email_error, Some("Please enter a valid email address"));
        assert_eq!(vm.start.label, "Loading Questions...");
    }

    #[test]
    fn valid_form_enables_start() {
        let draft = CandidateDraft::new("Ada Lovelace", "ada@example.com", "09123456789");
        let vm = map_landing(&draft, TouchedFields::all(), PreloadState::Failed, false);
        assert!(!vm.start.disabled);
        assert_eq!(vm.start.title, "Quiz data will load when you click start");

        let starting = map_landing(&draft, TouchedFields::all(), PreloadState::Ready, true);
        assert!(starting.start.disabled);
    }
}
