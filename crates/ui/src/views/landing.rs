use dioxus::prelude::*;
use quiz_core::model::{CandidateDraft, CandidateField};

use crate::vm::LandingVm;

#[component]
pub fn LandingView(
    vm: LandingVm,
    draft: CandidateDraft,
    on_input: EventHandler<(CandidateField, String)>,
    on_blur: EventHandler<CandidateField>,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "section landing-section", id: "landing-section",
            header { class: "landing-header",
                h1 { "Front-end Skills Assessment" }
                p { class: "landing-subtitle",
                    "Three subjects, 10 questions each, 5 minutes per subject."
                }
            }
            form {
                class: "student-form",
                id: "student-form",
                novalidate: true,
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                FormField {
                    id: "student-name",
                    label: "Full Name",
                    input_type: "text",
                    value: draft.name.clone(),
                    error: vm.name_error,
                    field: CandidateField::Name,
                    on_input,
                    on_blur,
                }
                FormField {
                    id: "whatsapp-number",
                    label: "WhatsApp Number",
                    input_type: "tel",
                    value: draft.contact_number.clone(),
                    error: vm.contact_error,
                    field: CandidateField::ContactNumber,
                    on_input,
                    on_blur,
                }
                FormField {
                    id: "email",
                    label: "Email Address",
                    input_type: "email",
                    value: draft.email.clone(),
                    error: vm.email_error,
                    field: CandidateField::Email,
                    on_input,
                    on_blur,
                }
                button {
                    class: "{vm.start.class}",
                    id: "start-exam-btn",
                    r#type: "submit",
                    title: "{vm.start.title}",
                    disabled: vm.start.disabled,
                    "{vm.start.label}"
                }
            }
        }
    }
}

#[component]
fn FormField(
    id: &'static str,
    label: &'static str,
    input_type: &'static str,
    value: String,
    error: Option<&'static str>,
    field: CandidateField,
    on_input: EventHandler<(CandidateField, String)>,
    on_blur: EventHandler<CandidateField>,
) -> Element {
    let error_id = format!("{id}-error");
    let input_class = if error.is_some() {
        "form-input invalid"
    } else {
        "form-input"
    };
    rsx! {
        div { class: "form-group",
            label { r#for: "{id}", "{label}" }
            input {
                id: "{id}",
                r#type: "{input_type}",
                class: "{input_class}",
                value: "{value}",
                aria_describedby: "{error_id}",
                oninput: move |evt: FormEvent| on_input.call((field, evt.value())),
                onblur: move |_| on_blur.call(field),
            }
            span { class: "field-error", id: "{error_id}", role: "alert",
                if let Some(message) = error {
                    "{message}"
                }
            }
        }
    }
}
