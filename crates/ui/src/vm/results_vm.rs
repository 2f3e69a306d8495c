use quiz_core::time::format_clock;
use services::{FinalResults, SubjectResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectResultsVm {
    pub title: String,
    pub score_text: String,
    pub time_text: String,
    pub continue_label: String,
    pub auto_submitted: bool,
}

#[must_use]
pub fn map_subject_results(result: &SubjectResult) -> SubjectResultsVm {
    let subject = result.subject;
    let continue_label = subject.next().map_or_else(
        || "View Final Results".to_string(),
        |next| format!("Continue to {}", next.title()),
    );
    SubjectResultsVm {
        title: format!("{} {} Results", subject.icon(), subject.title()),
        score_text: format!("{}/{}", result.score, result.out_of),
        time_text: format_clock(result.elapsed),
        continue_label,
        auto_submitted: result.auto_submitted,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalRowVm {
    pub label: String,
    pub score_text: String,
    pub time_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalResultsVm {
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub rows: Vec<FinalRowVm>,
    pub total_score_text: String,
    pub total_time_text: String,
}

#[must_use]
pub fn map_final_results(results: &FinalResults) -> FinalResultsVm {
    let rows = results
        .subjects
        .iter()
        .map(|row| FinalRowVm {
            label: format!("{} {}", row.subject.icon(), row.subject.key()),
            score_text: format!("{}/{}", row.score, row.out_of),
            time_text: format_clock(row.elapsed),
        })
        .collect();
    FinalResultsVm {
        name: results.candidate.name().to_owned(),
        email: results.candidate.email().to_owned(),
        contact_number: results.candidate.contact_number().to_owned(),
        rows,
        total_score_text: format!("{}/{}", results.total_score(), results.max_score()),
        total_time_text: format_clock(results.total_time()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::test_support::started_session;
    use chrono::Duration;
    use quiz_core::model::Subject;
    use quiz_core::time::fixed_moment;

    #[test]
    fn subject_results_labels() {
        let now = fixed_moment();
        let mut session = started_session(now);
        session.submit_subject(false, now + Duration::seconds(95));

        let vm = map_subject_results(&session.current_result().unwrap());
        assert_eq!(vm.title, "🧩 HTML Quiz Results");
        assert_eq!(vm.score_text, "0/10");
        assert_eq!(vm.time_text, "01:35");
        assert_eq!(vm.continue_label, "Continue to CSS Quiz");
        assert!(!vm.auto_submitted);
    }

    #[test]
    fn last_subject_leads_to_final_results() {
        let result = SubjectResult {
            subject: Subject::Js,
            score: 7,
            out_of: 10,
            elapsed: Duration::minutes(5),
            auto_submitted: true,
        };
        let vm = map_subject_results(&result);
        assert_eq!(vm.continue_label, "View Final Results");
        assert_eq!(vm.score_text, "7/10");
        assert!(vm.auto_submitted);
    }

    #[test]
    fn final_results_totals() {
        let now = fixed_moment();
        let mut session = started_session(now);
        for _ in Subject::ALL {
            session.submit_subject(false, now + Duration::seconds(20));
            session.continue_to_next(now);
        }

        let vm = map_final_results(&session.final_results().unwrap());
        assert_eq!(vm.name, "Ada Lovelace");
        assert_eq!(vm.rows.len(), 3);
        assert_eq!(vm.rows[1].label, "🎨 CSS");
        assert_eq!(vm.total_score_text, "0/30");
        assert_eq!(vm.total_time_text, "01:00");
    }
}
