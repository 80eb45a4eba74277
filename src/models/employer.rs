use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub alternate_url: Option<String>,
    pub logo_urls: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EmployerVacancyCount {
    pub company_name: Option<String>,
    pub vacancies_count: i64,
}
