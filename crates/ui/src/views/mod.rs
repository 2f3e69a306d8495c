mod close_guard;
mod landing;
mod modal;
mod question;
mod quiz_app;
mod results;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use close_guard::WindowCloseGuard;
pub use landing::LandingView;
pub use modal::{ErrorModal, LeaveConfirmModal};
pub use question::QuestionView;
pub use quiz_app::QuizApp;
pub use results::{FinalResultsView, SubjectResultsView};
