use chrono::Duration;
use quiz_core::{Moment, QuizRules};
use quiz_core::time::format_clock;
use services::{QuizPhase, QuizSession};

/// Colour of the countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTone {
    Normal,
    Warning,
    Danger,
}

impl TimerTone {
    #[must_use]
    pub fn for_remaining(remaining: Duration, rules: &QuizRules) -> Self {
        if remaining <= rules.danger_threshold() {
            Self::Danger
        } else if remaining <= rules.warning_threshold() {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Normal => "timer",
            Self::Warning => "timer warning",
            Self::Danger => "timer warning danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: u8,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub title: String,
    pub progress_text: String,
    pub progress_percent: u8,
    pub timer_text: String,
    pub timer_tone: TimerTone,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub prev_enabled: bool,
    pub next_label: &'static str,
    pub is_last: bool,
}

/// Render model of the question on screen, or `None` outside a subject.
#[must_use]
pub fn map_question(session: &QuizSession, now: Moment) -> Option<QuestionVm> {
    if session.phase() != QuizPhase::SubjectInProgress {
        return None;
    }
    let question = session.current_question()?;
    let subject = session.current_subject();
    let progress = session.progress();
    let remaining = session.remaining(now);
    let selected = session.selected_option();

    let options = (0_u8..)
        .zip(question.options().iter())
        .map(|(index, text)| OptionVm {
            index,
            text: text.clone(),
            selected: selected == Some(index),
        })
        .collect();

    Some(QuestionVm {
        title: format!("{} {}", subject.icon(), subject.title()),
        progress_text: format!("Question {} of {}", progress.number, progress.total),
        progress_percent: progress.percent(),
        timer_text: format_clock(remaining),
        timer_tone: TimerTone::for_remaining(remaining, session.rules()),
        prompt: question.prompt().to_owned(),
        options,
        prev_enabled: !progress.is_first(),
        next_label: if progress.is_last() {
            "Finish Subject"
        } else {
            "Next →"
        },
        is_last: progress.is_last(),
    })
}
