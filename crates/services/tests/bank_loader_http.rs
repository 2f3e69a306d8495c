mod support;

use std::time::Duration;

use quiz_core::QuizRules;
use quiz_core::model::Subject;
use services::{BankSource, LoadError, QuestionBankLoader};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use support::bank_document;

/// Serve one canned HTTP response per connection, forever.
async fn serve(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}/quiz-data.json")
}

fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn loads_bank_over_http() {
    let url = serve(ok_response(&bank_document(40, 40, 40))).await;
    let loader = QuestionBankLoader::new(BankSource::parse(&url), &QuizRules::default());

    let bank = loader.load().await.unwrap();
    assert_eq!(bank.questions(Subject::Js).len(), 40);
}

#[tokio::test]
async fn non_success_status_is_a_load_error() {
    let url = serve(
        "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string(),
    )
    .await;
    let loader = QuestionBankLoader::new(BankSource::parse(&url), &QuizRules::default());

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, LoadError::HttpStatus(status) if status.as_u16() == 404));
    assert!(err.user_message().starts_with("Failed to load quiz data."));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let rules = QuizRules::default().with_fetch_timeout(Duration::from_millis(200));
    let source = BankSource::parse(&format!("http://{addr}/quiz-data.json"));
    let loader = QuestionBankLoader::new(source, &rules);

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, LoadError::Timeout(_)));
    assert!(err.user_message().starts_with("Loading timeout"));
}
