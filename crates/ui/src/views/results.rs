use dioxus::prelude::*;

use crate::vm::{FinalResultsVm, QuizIntent, SubjectResultsVm};

#[component]
pub fn SubjectResultsView(vm: SubjectResultsVm, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        section { class: "section subject-results-section", id: "subject-results-section",
            h2 { id: "subject-results-title", "{vm.title}" }
            if vm.auto_submitted {
                p { class: "results-note", "Time's up! Your answers were submitted automatically." }
            }
            dl { class: "results-stats",
                dt { "Score" }
                dd { id: "subject-score-text", "{vm.score_text}" }
                dt { "Time" }
                dd { id: "subject-time-text", "{vm.time_text}" }
            }
            button {
                class: "btn btn--primary",
                id: "continue-btn",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::Continue),
                "{vm.continue_label}"
            }
        }
    }
}

#[component]
pub fn FinalResultsView(
    vm: FinalResultsVm,
    on_share: EventHandler<()>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    rsx! {
        section { class: "section final-results-section", id: "final-results-section",
            h2 { "🎉 Quiz Completed!" }
            div { class: "student-summary",
                p { "Name: " span { id: "final-student-name", "{vm.name}" } }
                p { "Email: " span { id: "final-student-email", "{vm.email}" } }
                p { "WhatsApp: " span { id: "final-student-phone", "{vm.contact_number}" } }
            }
            table { class: "results-table",
                thead {
                    tr {
                        th { "Subject" }
                        th { "Score" }
                        th { "Time" }
                    }
                }
                tbody {
                    for row in vm.rows.iter() {
                        tr { key: "{row.label}",
                            td { "{row.label}" }
                            td { "{row.score_text}" }
                            td { "{row.time_text}" }
                        }
                    }
                }
                tfoot {
                    tr { class: "results-total",
                        td { "Total" }
                        td { id: "final-total-score", "{vm.total_score_text}" }
                        td { id: "final-total-time", "{vm.total_time_text}" }
                    }
                }
            }
            div { class: "final-actions",
                button {
                    class: "btn btn--primary",
                    id: "send-whatsapp-btn",
                    r#type: "button",
                    onclick: move |_| on_share.call(()),
                    "📱 Send Results via WhatsApp"
                }
                button {
                    class: "btn btn--secondary",
                    id: "restart-btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Restart),
                    "🔄 Take Quiz Again"
                }
            }
        }
    }
}
