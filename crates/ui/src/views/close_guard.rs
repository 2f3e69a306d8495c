use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::{WindowCloseBehaviour, use_wry_event_handler, window};
use dioxus::prelude::*;

use super::modal::LeaveConfirmModal;

fn close_behaviour(active: bool) -> WindowCloseBehaviour {
    if active {
        WindowCloseBehaviour::WindowHides
    } else {
        WindowCloseBehaviour::WindowCloses
    }
}

/// Asks for confirmation before the window closes while `active`.
///
/// While armed the window only hides on a close request; the guard shows it
/// again with the confirmation dialog.
#[component]
pub fn WindowCloseGuard(active: bool) -> Element {
    let mut armed = use_signal(|| active);
    let mut prompt = use_signal(|| false);

    use_effect(use_reactive!(|active| {
        armed.set(active);
        window().set_close_behavior(close_behaviour(active));
        if !active {
            prompt.set(false);
        }
    }));

    use_wry_event_handler(move |event, _| {
        if let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } = event
        {
            if *armed.peek() {
                tracing::info!("close requested during a quiz");
                prompt.set(true);
            }
        }
    });

    use_effect(move || {
        if prompt() {
            let desktop = window();
            desktop.set_visible(true);
            desktop.set_focus();
        }
    });

    let on_leave = move |()| {
        tracing::info!("leaving with an unfinished quiz");
        let desktop = window();
        desktop.set_close_behavior(close_behaviour(false));
        desktop.close();
    };

    rsx! {
        if prompt() {
            LeaveConfirmModal { on_stay: move |()| prompt.set(false), on_leave }
        }
    }
}
