#![forbid(unsafe_code)]

pub mod model;
pub mod rules;
pub mod time;

pub use rules::QuizRules;
pub use time::{Clock, Moment};
