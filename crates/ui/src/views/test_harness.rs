use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::QuizRules;
use quiz_core::time::fixed_now;
use services::{
    BankSource, Clock, QuestionBankLoader, QuizLoopService, ShareError, ShareTarget,
};
use storage::repository::Storage;
use tempfile::TempDir;

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::quiz_app::QuizTestHandles;
use crate::views::QuizApp;
use crate::vm::test_support::bank_document;

pub const SHARE_RECIPIENT: &str = "09163106930";

/// Records opened links, or refuses them all.
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
    fail: bool,
}

impl UiLinkOpener for RecordingOpener {
    fn open_url(&self, url: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::Open("no handler".to_string()));
        }
        self.opened
            .lock()
            .expect("opener lock")
            .push(url.to_string());
        Ok(())
    }
}

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    opener: Arc<RecordingOpener>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn share_target(&self) -> ShareTarget {
        ShareTarget::new(Some(SHARE_RECIPIENT)).expect("valid recipient")
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.opener.clone()
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizAppHarness(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizApp {} }
}

/// How the question document is provided to the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankFixture {
    Valid,
    Missing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenerFixture {
    Working,
    Failing,
}

pub struct QuizHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub handles: QuizTestHandles,
    pub quiz_loop: Arc<QuizLoopService>,
    pub opener: Arc<RecordingOpener>,
    _dir: TempDir,
}

impl QuizHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive the dom until `done` holds or the attempts run out.
    pub async fn drive_until(&mut self, mut done: impl FnMut(&Self) -> bool) {
        for _ in 0..40 {
            if done(self) {
                return;
            }
            self.drive_async().await;
        }
    }

    pub fn in_runtime<O>(&self, f: impl FnOnce() -> O) -> O {
        self.dom.in_runtime(f)
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_quiz_harness(bank: BankFixture, opener: OpenerFixture) -> QuizHarness {
    setup_quiz_harness_with_storage(bank, opener, Storage::in_memory()).await
}

pub async fn setup_quiz_harness_with_storage(
    bank: BankFixture,
    opener: OpenerFixture,
    storage: Storage,
) -> QuizHarness {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("quiz-data.json");
    if bank == BankFixture::Valid {
        tokio::fs::write(&path, bank_document())
            .await
            .expect("write bank");
    }

    let rules = QuizRules::default();
    let loader = QuestionBankLoader::new(BankSource::File(path), &rules);
    let quiz_loop = Arc::new(
        QuizLoopService::new(Clock::fixed(fixed_now()), rules, loader, &storage).with_seed(7),
    );
    let opener = Arc::new(RecordingOpener {
        opened: Mutex::new(Vec::new()),
        fail: opener == OpenerFixture::Failing,
    });
    let handles = QuizTestHandles::default();

    let app = Arc::new(TestApp {
        quiz_loop: Arc::clone(&quiz_loop),
        opener: Arc::clone(&opener),
    });
    let dom = VirtualDom::new_with_props(
        QuizAppHarness,
        QuizHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    QuizHarness {
        dom,
        storage,
        handles,
        quiz_loop,
        opener,
        _dir: dir,
    }
}
