#![allow(dead_code)]

use std::path::PathBuf;

use quiz_core::model::{CandidateDraft, Subject};
use quiz_core::time::fixed_clock;
use quiz_core::QuizRules;
use serde_json::{Value, json};
use services::{BankSource, QuestionBankLoader, QuizLoopService};
use storage::repository::Storage;

pub fn bank_document(html: usize, css: usize, js: usize) -> String {
    let section = |subject: Subject, count: usize| -> Value {
        (0..count)
            .map(|n| {
                json!({
                    "id": n + 1 + subject.index() * 100,
                    "question": format!("{} question {n}?", subject.key()),
                    "options": ["A", "B", "C", "D"],
                    "answerIndex": (n * 3) % 4,
                })
            })
            .collect()
    };
    json!({
        "HTML": section(Subject::Html, html),
        "CSS": section(Subject::Css, css),
        "JS": section(Subject::Js, js),
    })
    .to_string()
}

pub fn write_bank(dir: &tempfile::TempDir, document: &str) -> PathBuf {
    let path = dir.path().join("quiz-data.json");
    std::fs::write(&path, document).expect("write bank");
    path
}

pub fn ada() -> CandidateDraft {
    CandidateDraft::new("Ada Lovelace", "ada@example.com", "09123456789")
}

/// Service over a file-backed bank, a fixed clock and a seeded selector.
pub fn quiz_service(dir: &tempfile::TempDir, document: &str, storage: &Storage) -> QuizLoopService {
    quiz_service_with_rules(dir, document, storage, QuizRules::default())
}

pub fn quiz_service_with_rules(
    dir: &tempfile::TempDir,
    document: &str,
    storage: &Storage,
    rules: QuizRules,
) -> QuizLoopService {
    let loader = QuestionBankLoader::new(BankSource::File(write_bank(dir, document)), &rules);
    QuizLoopService::new(fixed_clock(), rules, loader, storage).with_seed(2024)
}
