use std::sync::Arc;

use chrono::Duration;
use dioxus::prelude::{ReadableExt, WritableExt};
use quiz_core::model::{CandidateDraft, ProgressSnapshot};
use quiz_core::time::fixed_now;
use services::{PROGRESS_KEY, SnapshotStore};
use storage::repository::Storage;

use super::test_harness::{
    BankFixture, OpenerFixture, QuizHarness, SHARE_RECIPIENT, setup_quiz_harness,
    setup_quiz_harness_with_storage,
};
use crate::vm::{QuizIntent, Section};

fn ada() -> CandidateDraft {
    CandidateDraft::new("Ada Lovelace", "ada@example.com", "09123456789")
}

async fn start_as_ada(harness: &mut QuizHarness) {
    let handles = harness.handles.clone();
    harness.in_runtime(|| {
        handles.draft().set(ada());
        handles.start().call(());
    });
    let handles = harness.handles.clone();
    harness
        .drive_until(|h| h.in_runtime(|| handles.driver().read().is_some()))
        .await;
    harness.drive_async().await;
}

fn dispatch(harness: &mut QuizHarness, intent: QuizIntent) {
    let handles = harness.handles.clone();
    harness.in_runtime(|| handles.dispatch().call(intent));
    super::test_harness::drive_dom(&mut harness.dom);
}

fn current_section(harness: &mut QuizHarness) -> Section {
    let handles = harness.handles.clone();
    harness.in_runtime(|| Section::for_driver(handles.driver().read().as_ref()))
}

fn finish_all_subjects(harness: &mut QuizHarness) {
    for _ in 0..3 {
        dispatch(harness, QuizIntent::SubmitSubject);
        dispatch(harness, QuizIntent::Continue);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn landing_smoke_renders_form_and_ready_button() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    let quiz_loop = Arc::clone(&harness.quiz_loop);
    harness.drive_until(|_| quiz_loop.is_loaded()).await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Full Name"), "missing name field in {html}");
    assert!(html.contains("WhatsApp Number"), "missing phone field in {html}");
    assert!(html.contains("Start Exam"), "missing start label in {html}");
    assert!(!html.contains("Full name is required"), "error shown early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn landing_smoke_prefills_recent_candidate() {
    let storage = Storage::in_memory();
    let store = SnapshotStore::new(Arc::clone(&storage.local), Duration::hours(24));
    let candidate = ada().validate().unwrap();
    store
        .try_save(&ProgressSnapshot::identity_only(&candidate, fixed_now()))
        .await
        .expect("save snapshot");

    let mut harness =
        setup_quiz_harness_with_storage(BankFixture::Valid, OpenerFixture::Working, storage).await;
    harness.rebuild();
    let handles = harness.handles.clone();
    harness
        .drive_until(|h| h.in_runtime(|| handles.draft().read().name == "Ada Lovelace"))
        .await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Ada Lovelace"), "missing restored name in {html}");
    assert!(html.contains("09123456789"), "missing restored number in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn invalid_form_does_not_start() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    let handles = harness.handles.clone();
    harness.in_runtime(|| {
        handles.draft().set(CandidateDraft::new("A", "ada@", "123"));
        handles.start().call(());
    });
    harness.drive_async().await;

    let html = harness.render();
    assert!(harness.in_runtime(|| handles.driver().read().is_none()));
    assert!(
        html.contains("Name must be at least 2 characters"),
        "missing name error in {html}"
    );
    assert!(
        html.contains("Please enter a valid email address"),
        "missing email error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_smoke_navigates_and_finishes_subject() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    start_as_ada(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("🧩 HTML Quiz"), "missing subject title in {html}");
    assert!(html.contains("Question 1 of 10"), "missing progress in {html}");
    assert!(html.contains("05:00"), "missing timer in {html}");

    dispatch(&mut harness, QuizIntent::SelectOption(1));
    dispatch(&mut harness, QuizIntent::Next);
    let html = harness.render();
    assert!(html.contains("Question 2 of 10"), "missing next question in {html}");

    dispatch(&mut harness, QuizIntent::Prev);
    let handles = harness.handles.clone();
    let selected = harness.in_runtime(|| {
        handles
            .driver()
            .read()
            .as_ref()
            .and_then(|driver| driver.session().selected_option())
    });
    assert_eq!(selected, Some(1));

    dispatch(&mut harness, QuizIntent::SubmitSubject);
    let html = harness.render();
    assert!(html.contains("HTML Quiz Results"), "missing results title in {html}");
    assert!(html.contains("Continue to CSS Quiz"), "missing continue label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn final_results_smoke_shares_via_deep_link() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    start_as_ada(&mut harness).await;
    finish_all_subjects(&mut harness);

    let html = harness.render();
    assert!(html.contains("Quiz Completed"), "missing final title in {html}");
    assert!(html.contains("0/30"), "missing total score in {html}");

    let handles = harness.handles.clone();
    harness.in_runtime(|| handles.share().call(()));
    let opened = harness.opener.opened.lock().unwrap().clone();
    assert_eq!(opened.len(), 1);
    assert!(
        opened[0].starts_with(&format!("https://wa.me/{SHARE_RECIPIENT}?text=")),
        "unexpected link {}",
        opened[0]
    );
    assert!(harness.in_runtime(|| handles.modal().read().is_none()));
}

#[tokio::test(flavor = "current_thread")]
async fn share_failure_falls_back_to_copyable_message() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Failing).await;
    harness.rebuild();
    start_as_ada(&mut harness).await;
    finish_all_subjects(&mut harness);

    let handles = harness.handles.clone();
    harness.in_runtime(|| handles.share().call(()));
    super::test_harness::drive_dom(&mut harness.dom);

    let html = harness.render();
    assert!(
        html.contains("Unable to open WhatsApp automatically"),
        "missing fallback message in {html}"
    );
    assert!(html.contains("Copy Message"), "missing copy button in {html}");
    assert!(html.contains("Total Score: 0/30"), "missing summary text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_bank_shows_load_error() {
    let mut harness = setup_quiz_harness(BankFixture::Missing, OpenerFixture::Working).await;
    harness.rebuild();
    let handles = harness.handles.clone();
    harness.in_runtime(|| {
        handles.draft().set(ada());
        handles.start().call(());
    });
    harness
        .drive_until(|h| h.in_runtime(|| handles.modal().read().is_some()))
        .await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Failed to load quiz data"),
        "missing load error in {html}"
    );
    assert!(harness.in_runtime(|| handles.driver().read().is_none()));
}

#[tokio::test(flavor = "current_thread")]
async fn restart_returns_to_empty_landing_and_clears_progress() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    start_as_ada(&mut harness).await;
    finish_all_subjects(&mut harness);
    dispatch(&mut harness, QuizIntent::Restart);

    let html = harness.render();
    assert!(html.contains("Full Name"), "missing landing form in {html}");
    assert!(!html.contains("Ada Lovelace"), "form not cleared in {html}");

    harness.quiz_loop.flush_snapshots().await.expect("flush");
    let stored = harness
        .storage
        .local
        .get_item(PROGRESS_KEY)
        .await
        .expect("read storage");
    assert_eq!(stored, None);
}

#[tokio::test(flavor = "current_thread")]
async fn window_close_is_guarded_only_while_a_run_is_unfinished() {
    let mut harness = setup_quiz_harness(BankFixture::Valid, OpenerFixture::Working).await;
    harness.rebuild();
    assert!(!current_section(&mut harness).guards_close());

    start_as_ada(&mut harness).await;
    assert!(current_section(&mut harness).guards_close());

    dispatch(&mut harness, QuizIntent::SubmitSubject);
    assert_eq!(current_section(&mut harness), Section::SubjectResults);
    assert!(current_section(&mut harness).guards_close());

    dispatch(&mut harness, QuizIntent::Continue);
    for _ in 0..2 {
        dispatch(&mut harness, QuizIntent::SubmitSubject);
        dispatch(&mut harness, QuizIntent::Continue);
    }
    assert_eq!(current_section(&mut harness), Section::FinalResults);
    assert!(!current_section(&mut harness).guards_close());

    let html = harness.render();
    assert!(!html.contains("Your quiz progress will be lost."), "unexpected prompt in {html}");
}
