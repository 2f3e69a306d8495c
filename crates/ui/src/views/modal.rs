use dioxus::document::eval;
use dioxus::prelude::*;

use crate::vm::ErrorModalVm;

const FALLBACK_TEXT_ID: &str = "fallback-text";

fn copy_fallback_script() -> String {
    format!(
        r"(function() {{
            const el = document.getElementById({FALLBACK_TEXT_ID:?});
            if (!el) return;
            el.select();
            el.setSelectionRange(0, 99999);
            document.execCommand('copy');
        }})();"
    )
}

#[component]
pub fn ErrorModal(vm: ErrorModalVm, on_close: EventHandler<()>) -> Element {
    let mut copied = use_signal(|| false);

    use_effect(move || {
        let _ = eval("document.getElementById('close-error-btn')?.focus();");
    });

    let on_copy = move |_| {
        let _ = eval(&copy_fallback_script());
        copied.set(true);
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            copied.set(false);
        });
    };

    rsx! {
        div {
            class: "modal",
            id: "error-modal",
            role: "dialog",
            aria_modal: "true",
            aria_hidden: "false",
            aria_labelledby: "error-title",
            div { class: "modal-content",
                h3 { id: "error-title", "⚠️ Error" }
                p { id: "error-message", "{vm.message}" }
                if let Some(text) = vm.fallback_text.as_deref() {
                    div { class: "fallback-message", id: "fallback-message",
                        textarea { id: FALLBACK_TEXT_ID, readonly: true, rows: "8", value: "{text}" }
                        button {
                            class: "btn btn--secondary",
                            id: "copy-fallback-btn",
                            r#type: "button",
                            onclick: on_copy,
                            if copied() { "✓ Copied!" } else { "Copy Message" }
                        }
                    }
                }
                button {
                    class: "btn btn--primary",
                    id: "close-error-btn",
                    r#type: "button",
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }
        }
    }
}

/// Shown when the window is closed before the quiz is finished.
#[component]
pub fn LeaveConfirmModal(on_stay: EventHandler<()>, on_leave: EventHandler<()>) -> Element {
    use_effect(move || {
        let _ = eval("document.getElementById('stay-btn')?.focus();");
    });

    rsx! {
        div {
            class: "modal",
            id: "leave-modal",
            role: "alertdialog",
            aria_modal: "true",
            aria_labelledby: "leave-title",
            div { class: "modal-content",
                h3 { id: "leave-title", "Leave the quiz?" }
                p { "Your quiz progress will be lost." }
                div { class: "modal-actions",
                    button {
                        class: "btn btn--primary",
                        id: "stay-btn",
                        r#type: "button",
                        onclick: move |_| on_stay.call(()),
                        "Stay"
                    }
                    button {
                        class: "btn btn--outline",
                        id: "leave-btn",
                        r#type: "button",
                        onclick: move |_| on_leave.call(()),
                        "Leave"
                    }
                }
            }
        }
    }
}
