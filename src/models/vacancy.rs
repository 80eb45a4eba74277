use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: i32,
    pub hh_id: Option<String>,
    pub name: Option<String>,
    pub employer_id: Option<String>,
    pub salary: Option<JsonValue>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Vacancy joined with its employer's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VacancyListing {
    pub company_name: Option<String>,
    pub vacancy_name: Option<String>,
    pub salary: Option<JsonValue>,
    pub url: Option<String>,
}

impl VacancyListing {
    pub fn salary_view(&self) -> Option<SalaryView<'_>> {
        self.salary.as_ref().and_then(SalaryView::new)
    }
}

/// Read-only accessor over the opaque salary blob; every key may be missing.
#[derive(Debug, Clone, Copy)]
pub struct SalaryView<'a> {
    blob: &'a serde_json::Map<String, JsonValue>,
}

impl<'a> SalaryView<'a> {
    /// `None` for JSON `null`, non-objects and `{}`.
    pub fn new(value: &'a JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) if !map.is_empty() => Some(Self { blob: map }),
            _ => None,
        }
    }

    pub fn lower_bound(&self) -> Option<&'a JsonValue> {
        self.field("from")
    }

    pub fn upper_bound(&self) -> Option<&'a JsonValue> {
        self.field("to")
    }

    pub fn currency(&self) -> Option<&'a JsonValue> {
        self.field("currency")
    }

    pub fn lower_bound_f64(&self) -> Option<f64> {
        self.lower_bound().and_then(JsonValue::as_f64)
    }

    fn field(&self, key: &str) -> Option<&'a JsonValue> {
        self.blob.get(key).filter(|v| !v.is_null())
    }
}
