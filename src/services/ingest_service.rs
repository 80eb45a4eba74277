use tracing::{info, instrument};

use crate::error::Result;
use crate::services::hh_service::VacancySource;
use crate::services::writer_service::{VacancyWriter, WriteSummary};

/// Fetch one page of vacancies for the tracked employers and store it.
pub struct IngestService<S> {
    source: S,
    writer: VacancyWriter,
}

impl<S: VacancySource> IngestService<S> {
    pub fn new(source: S, writer: VacancyWriter) -> Self {
        Self { source, writer }
    }

    #[instrument(skip(self, employer_ids), fields(employers = employer_ids.len()))]
    pub async fn run(&self, employer_ids: &[String], query: &str) -> Result<WriteSummary> {
        let records = self.source.fetch_vacancies(employer_ids, query).await;
        info!(fetched = records.len(), "Storing fetched vacancies");
        self.writer.write(&records).await
    }
}
