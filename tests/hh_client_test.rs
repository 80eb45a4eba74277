use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::RawQuery, http::StatusCode, routing::get, Json, Router};
use hh_vacancies::config::HhSettings;
use hh_vacancies::services::hh_service::{HhClient, VacancySource};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{}", addr)
}

fn client(api_url: String) -> HhClient {
    HhClient::new(HhSettings {
        api_url,
        per_page: 100,
        user_agent: "hh-vacancies-test".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

#[tokio::test]
async fn fetches_single_page_for_employers() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorder = seen.clone();

    let app = Router::new().route(
        "/vacancies",
        get(move |RawQuery(query): RawQuery| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(query.unwrap_or_default());
                Json(json!({
                    "items": [{
                        "id": "123",
                        "name": "Python Developer",
                        "employer": { "id": "456", "name": "Company Inc" },
                        "salary": { "from": 100000, "to": 150000, "currency": "RUR" },
                        "url": "https://api.hh.ru/vacancies/123",
                        "published_at": "2024-03-01T10:15:00+0300",
                        "snippet": { "requirement": "3+ years", "responsibility": null }
                    }],
                    "found": 1,
                    "pages": 1
                }))
            }
        }),
    );
    let client = client(spawn(app).await);

    let ids = vec!["456".to_string(), "789".to_string()];
    let items = client.fetch_vacancies(&ids, "python").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_deref(), Some("123"));
    assert_eq!(items[0].name.as_deref(), Some("Python Developer"));

    let queries = seen.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert!(query.contains("employer_id=456"));
    assert!(query.contains("employer_id=789"));
    assert!(query.contains("text=python"));
    assert!(query.contains("per_page=100"));
    assert!(query.contains("page=0"));
}

#[tokio::test]
async fn error_status_yields_empty_list() {
    let app = Router::new().route(
        "/vacancies",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let client = client(spawn(app).await);
    let ids = vec!["456".to_string()];

    assert!(client.try_fetch_vacancies(&ids, "").await.is_err());
    assert!(client.fetch_vacancies(&ids, "").await.is_empty());
}

#[tokio::test]
async fn malformed_body_yields_empty_list() {
    let app = Router::new().route("/vacancies", get(|| async { "<html>captcha</html>" }));
    let client = client(spawn(app).await);

    let items = client.fetch_vacancies(&["456".to_string()], "").await;
    assert!(items.is_empty());
}
