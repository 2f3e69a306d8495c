use dioxus::prelude::*;

use crate::vm::{OptionVm, QuestionVm, QuizIntent};

#[component]
pub fn QuestionView(vm: QuestionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let timer_class = vm.timer_tone.class();
    let next_intent = if vm.is_last {
        QuizIntent::SubmitSubject
    } else {
        QuizIntent::Next
    };
    rsx! {
        section { class: "section quiz-section", id: "quiz-section",
            header { class: "quiz-header",
                h2 { class: "subject-title", id: "subject-title", "{vm.title}" }
                div { class: "{timer_class}", id: "timer",
                    span { class: "timer-icon", "⏱️" }
                    span { id: "timer-display", "{vm.timer_text}" }
                }
            }
            div { class: "progress",
                div {
                    class: "progress-bar",
                    role: "progressbar",
                    aria_valuemin: "0",
                    aria_valuemax: "100",
                    aria_valuenow: "{vm.progress_percent}",
                    div { class: "progress-fill", style: "width: {vm.progress_percent}%" }
                }
                p { class: "progress-text", id: "progress-text", "{vm.progress_text}" }
            }
            div { class: "question-card",
                h3 { class: "question-text", id: "question-text", "{vm.prompt}" }
                div { class: "options", role: "radiogroup",
                    for option in vm.options.iter().cloned() {
                        OptionRow { key: "{option.index}", option, on_intent }
                    }
                }
            }
            nav { class: "quiz-nav",
                button {
                    class: "btn btn--secondary",
                    id: "prev-btn",
                    r#type: "button",
                    disabled: !vm.prev_enabled,
                    onclick: move |_| on_intent.call(QuizIntent::Prev),
                    "← Previous"
                }
                button {
                    class: "btn btn--primary",
                    id: "next-btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(next_intent),
                    "{vm.next_label}"
                }
                button {
                    class: "btn btn--outline",
                    id: "submit-subject-btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::SubmitSubject),
                    "Submit Subject"
                }
            }
        }
    }
}

#[component]
fn OptionRow(option: OptionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let id = format!("option-{}", option.index);
    let index = option.index;
    let class = if option.selected { "option selected" } else { "option" };
    rsx! {
        label {
            class: "{class}",
            r#for: "{id}",
            input {
                r#type: "radio",
                name: "answer",
                id: "{id}",
                value: "{index}",
                checked: option.selected,
                onchange: move |_| on_intent.call(QuizIntent::SelectOption(index)),
            }
            span { class: "option-text", "{option.text}" }
        }
    }
}
