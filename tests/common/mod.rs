#![allow(dead_code)]

use std::env;

use hh_vacancies::config::{Config, DatabaseSettings};
use hh_vacancies::database::pool::create_pool;
use hh_vacancies::dto::hh_dto::{HhEmployer, HhSnippet, HhVacancy};
use hh_vacancies::services::schema_service::SchemaService;
use hh_vacancies::AppState;
use serde_json::json;

/// Provisioning drops databases, so these tests only run against the
/// database prefix named in `HH_TEST_DATABASE`.
pub fn test_settings() -> Option<(DatabaseSettings, String)> {
    dotenvy::dotenv().ok();
    let Ok(prefix) = env::var("HH_TEST_DATABASE") else {
        eprintln!("HH_TEST_DATABASE not set, skipping PostgreSQL test");
        return None;
    };
    let config = Config::from_env().expect("POSTGRES_* settings for tests");
    Some((config.database, prefix))
}

/// Provisions `<prefix>_<suffix>` and returns services bound to it.
pub async fn fresh_state(suffix: &str) -> Option<(AppState, SchemaService, String)> {
    let (settings, prefix) = test_settings()?;
    let name = format!("{}_{}", prefix, suffix);

    let schema = SchemaService::new(settings.clone());
    schema.provision(&name).await.expect("provision");
    let pool = create_pool(&settings, &name).await.expect("pool");

    Some((AppState::new(pool), schema, name))
}

pub fn employer(id: &str, name: &str) -> HhEmployer {
    HhEmployer {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        url: Some(format!("https://api.hh.ru/employers/{}", id)),
        alternate_url: Some(format!("https://hh.ru/employer/{}", id)),
        logo_urls: Some(json!({ "original": format!("https://hh.ru/logo/{}.png", id) })),
    }
}

pub fn vacancy(id: &str, name: &str, employer: HhEmployer, salary_from: Option<i64>) -> HhVacancy {
    HhVacancy {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        employer: Some(employer),
        salary: salary_from.map(|from| json!({ "from": from, "to": null, "currency": "RUR" })),
        url: Some(format!("https://api.hh.ru/vacancies/{}", id)),
        published_at: Some("2024-03-01T10:15:00+0300".to_string()),
        snippet: Some(HhSnippet {
            requirement: Some(format!("requirement for {}", name)),
            responsibility: Some(format!("responsibility for {}", name)),
        }),
    }
}

pub async fn count(state: &AppState, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&state.pool)
        .await
        .expect("count")
}
