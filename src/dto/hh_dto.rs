use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Page returned by `GET /vacancies`. Only `items` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhVacancyPage {
    #[serde(default)]
    pub items: Vec<HhVacancy>,
}

/// Raw vacancy record. Fields are tolerated as absent or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhVacancy {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub employer: Option<HhEmployer>,
    #[serde(default)]
    pub salary: Option<JsonValue>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub snippet: Option<HhSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhEmployer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub logo_urls: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}

impl HhVacancy {
    /// External id used in log lines; `"<missing>"` when the API omitted it.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<missing>")
    }

    /// Salary blob to persist: `null` and `{}` are stored as SQL NULL.
    pub fn salary_blob(&self) -> Option<&JsonValue> {
        self.salary
            .as_ref()
            .filter(|v| !v.is_null() && v.as_object().map_or(true, |m| !m.is_empty()))
    }
}
