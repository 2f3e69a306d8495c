mod error_vm;
mod intent;
mod landing_vm;
mod quiz_vm;
mod results_vm;

pub use error_vm::ErrorModalVm;
pub use intent::{QuizIntent, Section, apply_intent, arrow_intent};
pub use landing_vm::{LandingVm, PreloadState, StartButtonVm, TouchedFields, map_landing};
pub use quiz_vm::{OptionVm, QuestionVm, TimerTone, map_question};
pub use results_vm::{
    FinalResultsVm, FinalRowVm, SubjectResultsVm, map_final_results, map_subject_results,
};
