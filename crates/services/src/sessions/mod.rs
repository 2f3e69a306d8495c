mod driver;
mod machine;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use driver::QuizDriver;
pub use machine::{NavDirection, QuizPhase, QuizSession, SessionEffect};
pub use progress::{FinalResults, QuestionProgress, SubjectResult};
pub use workflow::QuizLoopService;
