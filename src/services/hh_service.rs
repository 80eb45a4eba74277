use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, instrument, warn};

use crate::config::HhSettings;
use crate::dto::hh_dto::{HhVacancy, HhVacancyPage};
use crate::error::Result;

/// Where raw vacancy records come from. Implementations never fail: transport
/// problems are logged and produce an empty list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancySource: Send + Sync {
    async fn fetch_vacancies(&self, employer_ids: &[String], query: &str) -> Vec<HhVacancy>;
}

#[derive(Clone)]
pub struct HhClient {
    client: Client,
    settings: HhSettings,
}

impl HhClient {
    pub fn new(settings: HhSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, settings })
    }

    /// Single page of results, ranked by hh.ru.
    pub async fn try_fetch_vacancies(
        &self,
        employer_ids: &[String],
        query: &str,
    ) -> Result<Vec<HhVacancy>> {
        let url = format!("{}/vacancies", self.settings.api_url);

        let mut params: Vec<(&str, String)> = employer_ids
            .iter()
            .map(|id| ("employer_id", id.clone()))
            .collect();
        if !query.is_empty() {
            params.push(("text", query.to_string()));
        }
        params.push(("per_page", self.settings.per_page.to_string()));
        params.push(("page", "0".to_string()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let page = response.json::<HhVacancyPage>().await?;

        Ok(page.items)
    }
}

#[async_trait]
impl VacancySource for HhClient {
    #[instrument(skip(self, employer_ids), fields(employers = employer_ids.len()))]
    async fn fetch_vacancies(&self, employer_ids: &[String], query: &str) -> Vec<HhVacancy> {
        if employer_ids.is_empty() {
            warn!("Employer list is empty, nothing to fetch");
            return Vec::new();
        }

        match self.try_fetch_vacancies(employer_ids, query).await {
            Ok(items) => {
                info!(count = items.len(), "Fetched vacancies from hh.ru");
                items
            }
            Err(err) => {
                error!(error = %err, "hh.ru vacancy request failed");
                Vec::new()
            }
        }
    }
}
