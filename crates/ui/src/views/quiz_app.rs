use dioxus::document::eval;
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

use quiz_core::model::{CandidateDraft, CandidateField};
use services::{QuizDriver, StartError, TimerTick};

use crate::context::AppContext;
use crate::vm::{
    ErrorModalVm, PreloadState, QuizIntent, Section, TouchedFields, apply_intent, arrow_intent,
    map_final_results, map_landing, map_question, map_subject_results,
};

use super::close_guard::WindowCloseGuard;
use super::landing::LandingView;
use super::modal::ErrorModal;
use super::question::QuestionView;
use super::results::{FinalResultsView, SubjectResultsView};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Feed timer ticks into the driver until it is dropped or replaced.
async fn drive_ticks(
    mut driver: Signal<Option<QuizDriver>>,
    mut ticks: UnboundedReceiver<TimerTick>,
) {
    while let Some(tick) = ticks.recv().await {
        let mut guard = driver.write();
        let Some(active) = guard.as_mut() else {
            break;
        };
        active.on_tick(tick);
    }
}

/// Quiz screens and their state.
///
/// `guard_window_close` mounts the desktop close confirmation, so it must
/// only be set when running inside a desktop window.
#[component]
pub fn QuizApp(#[props(default)] guard_window_close: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let mut draft = use_signal(CandidateDraft::default);
    let mut touched = use_signal(TouchedFields::default);
    let mut starting = use_signal(|| false);
    let mut driver = use_signal(|| None::<QuizDriver>);
    let mut modal = use_signal(|| None::<ErrorModalVm>);

    let preload = {
        let quiz_loop = quiz_loop.clone();
        use_resource(move || {
            let quiz_loop = quiz_loop.clone();
            async move { quiz_loop.preload().await.is_ok() }
        })
    };

    {
        let quiz_loop = quiz_loop.clone();
        use_resource(move || {
            let quiz_loop = quiz_loop.clone();
            async move {
                if let Some(saved) = quiz_loop.restore_candidate().await {
                    tracing::debug!("restored candidate details");
                    draft.set(saved);
                }
            }
        });
    }

    let on_start = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            touched.set(TouchedFields::all());
            if starting() {
                return;
            }
            let submitted = draft();
            if !submitted.field_errors().is_empty() {
                return;
            }
            starting.set(true);
            let quiz_loop = quiz_loop.clone();
            spawn(async move {
                match quiz_loop.start_session(submitted).await {
                    Ok((started, ticks)) => {
                        driver.set(Some(started));
                        spawn(drive_ticks(driver, ticks));
                        let _ = eval("document.getElementById('quiz-root')?.focus();");
                    }
                    Err(StartError::Load(err)) => {
                        tracing::warn!(error = %err, "quiz could not start");
                        modal.set(Some(ErrorModalVm::load_failure(&err)));
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "start rejected");
                    }
                }
                starting.set(false);
            });
        })
    };

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        if intent == QuizIntent::Restart {
            if let Some(active) = driver.write().as_mut() {
                apply_intent(active, intent);
            }
            driver.set(None);
            draft.set(CandidateDraft::default());
            touched.set(TouchedFields::default());
            let _ = eval("document.getElementById('student-name')?.focus();");
            return;
        }
        if let Some(active) = driver.write().as_mut() {
            apply_intent(active, intent);
        }
    });

    let on_share = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            let guard = driver.read();
            let Some(active) = guard.as_ref() else {
                return;
            };
            let target = ctx.share_target();
            let opened = active
                .share_link(target)
                .and_then(|url| ctx.link_opener().open_url(url.as_str()));
            if let Err(err) = opened {
                tracing::warn!(error = %err, "results share failed");
                if let Ok(summary) = active.share_message() {
                    modal.set(Some(ErrorModalVm::share_fallback(summary, target)));
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, on_start, on_share, driver, draft, modal);
            }
        }
    }

    let on_key = move |evt: KeyboardEvent| {
        let guard = driver.read();
        let Some(active) = guard.as_ref() else {
            return;
        };
        if Section::for_driver(Some(active)) != Section::Quiz {
            return;
        }
        let progress = active.session().progress();
        let intent = arrow_intent(&evt.data.key(), progress.is_first(), progress.is_last());
        drop(guard);
        if let Some(intent) = intent {
            evt.prevent_default();
            dispatch_intent.call(intent);
        }
    };

    let on_input = move |(field, value): (CandidateField, String)| {
        let mut form = draft.write();
        match field {
            CandidateField::Name => form.name = value,
            CandidateField::ContactNumber => form.contact_number = value,
            CandidateField::Email => form.email = value,
        }
    };
    let on_blur = move |field: CandidateField| touched.write().mark(field);

    let preload_state = match *preload.value().read() {
        None => PreloadState::Loading,
        Some(true) => PreloadState::Ready,
        Some(false) => PreloadState::Failed,
    };

    let driver_guard = driver.read();
    let section = Section::for_driver(driver_guard.as_ref());
    let close_guarded = section.guards_close();
    let body = match (section, driver_guard.as_ref()) {
        (Section::Quiz, Some(active)) => map_question(active.session(), active.now()).map_or_else(
            || rsx! {},
            |vm| rsx! { QuestionView { vm, on_intent: dispatch_intent } },
        ),
        (Section::SubjectResults, Some(active)) => active.session().current_result().map_or_else(
            || rsx! {},
            |result| {
                let vm = map_subject_results(&result);
                rsx! { SubjectResultsView { vm, on_intent: dispatch_intent } }
            },
        ),
        (Section::FinalResults, Some(active)) => active.session().final_results().map_or_else(
            || rsx! {},
            |results| {
                let vm = map_final_results(&results);
                rsx! { FinalResultsView { vm, on_share, on_intent: dispatch_intent } }
            },
        ),
        _ => {
            let form = draft();
            let vm = map_landing(&form, touched(), preload_state, starting());
            rsx! {
                LandingView {
                    vm,
                    draft: form,
                    on_input,
                    on_blur,
                    on_submit: on_start,
                }
            }
        }
    };
    drop(driver_guard);

    rsx! {
        div { class: "quiz-app", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            {body}
            if let Some(vm) = modal() {
                ErrorModal { vm, on_close: move |()| modal.set(None) }
            }
            if guard_window_close {
                WindowCloseGuard { active: close_guarded }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    start: Rc<RefCell<Option<Callback<()>>>>,
    share: Rc<RefCell<Option<Callback<()>>>>,
    driver: Rc<RefCell<Option<Signal<Option<QuizDriver>>>>>,
    draft: Rc<RefCell<Option<Signal<CandidateDraft>>>>,
    modal: Rc<RefCell<Option<Signal<Option<ErrorModalVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        start: Callback<()>,
        share: Callback<()>,
        driver: Signal<Option<QuizDriver>>,
        draft: Signal<CandidateDraft>,
        modal: Signal<Option<ErrorModalVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.start.borrow_mut() = Some(start);
        *self.share.borrow_mut() = Some(share);
        *self.driver.borrow_mut() = Some(driver);
        *self.draft.borrow_mut() = Some(draft);
        *self.modal.borrow_mut() = Some(modal);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn start(&self) -> Callback<()> {
        (*self.start.borrow()).expect("quiz start registered")
    }

    pub(crate) fn share(&self) -> Callback<()> {
        (*self.share.borrow()).expect("quiz share registered")
    }

    pub(crate) fn driver(&self) -> Signal<Option<QuizDriver>> {
        (*self.driver.borrow()).expect("quiz driver registered")
    }

    pub(crate) fn draft(&self) -> Signal<CandidateDraft> {
        (*self.draft.borrow()).expect("quiz draft registered")
    }

    pub(crate) fn modal(&self) -> Signal<Option<ErrorModalVm>> {
        (*self.modal.borrow()).expect("quiz modal registered")
    }
}
