use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::dto::hh_dto::{HhEmployer, HhVacancy};
use crate::error::{Error, Result};
use crate::utils::time::parse_published_at;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub hh_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub employers_inserted: u64,
    pub vacancies_inserted: u64,
    pub snippets_inserted: u64,
    pub duplicates_skipped: u64,
    pub failures: Vec<RecordFailure>,
}

impl WriteSummary {
    fn record(&mut self, outcome: RecordOutcome) {
        if outcome.employer_inserted {
            self.employers_inserted += 1;
        }
        match outcome.vacancy_id {
            Some(_) => self.vacancies_inserted += 1,
            None => self.duplicates_skipped += 1,
        }
        if outcome.snippet_inserted {
            self.snippets_inserted += 1;
        }
    }
}

#[derive(Debug, Default)]
struct RecordOutcome {
    employer_inserted: bool,
    vacancy_id: Option<i32>,
    snippet_inserted: bool,
}

/// Validated columns for one record, built before anything is written.
struct VacancyRow<'a> {
    hh_id: &'a str,
    name: Option<&'a str>,
    employer: &'a HhEmployer,
    employer_id: &'a str,
    salary: Option<&'a JsonValue>,
    url: Option<&'a str>,
    published_at: Option<DateTime<Utc>>,
}

impl<'a> VacancyRow<'a> {
    fn from_record(record: &'a HhVacancy) -> Result<Self> {
        let hh_id = record
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidRecord("vacancy has no id".to_string()))?;
        let employer = record
            .employer
            .as_ref()
            .ok_or_else(|| Error::InvalidRecord("vacancy has no employer".to_string()))?;
        let employer_id = employer
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidRecord("employer has no id".to_string()))?;
        let published_at = record
            .published_at
            .as_deref()
            .map(parse_published_at)
            .transpose()?;

        Ok(Self {
            hh_id,
            name: record.name.as_deref(),
            employer,
            employer_id,
            salary: record.salary_blob(),
            url: record.url.as_deref(),
            published_at,
        })
    }
}

/// First-write-wins persistence of fetched vacancies. Existing employers and
/// vacancies are never updated.
#[derive(Clone)]
pub struct VacancyWriter {
    pool: PgPool,
}

impl VacancyWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Writes every record on one pooled connection. A failing record is logged
    /// and reported in the summary; the rest of the batch still goes through.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn write(&self, records: &[HhVacancy]) -> Result<WriteSummary> {
        let mut summary = WriteSummary::default();
        if records.is_empty() {
            info!("No vacancies to store");
            return Ok(summary);
        }

        let mut conn = self.pool.acquire().await?;
        for record in records {
            match Self::write_record(&mut conn, record).await {
                Ok(outcome) => summary.record(outcome),
                Err(err) => {
                    warn!(hh_id = %record.display_id(), error = %err, "Failed to store vacancy");
                    summary.failures.push(RecordFailure {
                        hh_id: record.display_id().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            employers = summary.employers_inserted,
            vacancies = summary.vacancies_inserted,
            snippets = summary.snippets_inserted,
            duplicates = summary.duplicates_skipped,
            failures = summary.failures.len(),
            "Vacancy batch stored"
        );
        Ok(summary)
    }

    async fn write_record(conn: &mut PgConnection, record: &HhVacancy) -> Result<RecordOutcome> {
        let row = VacancyRow::from_record(record)?;
        let mut outcome = RecordOutcome::default();

        let employer = sqlx::query(
            r#"
            INSERT INTO employers (id, name, url, alternate_url, logo_urls)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(row.employer_id)
        .bind(row.employer.name.as_deref())
        .bind(row.employer.url.as_deref())
        .bind(row.employer.alternate_url.as_deref())
        .bind(row.employer.logo_urls.as_ref())
        .execute(&mut *conn)
        .await?;
        outcome.employer_inserted = employer.rows_affected() > 0;

        outcome.vacancy_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO vacancies (hh_id, name, employer_id, salary, url, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (hh_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(row.hh_id)
        .bind(row.name)
        .bind(row.employer_id)
        .bind(row.salary)
        .bind(row.url)
        .bind(row.published_at)
        .fetch_optional(&mut *conn)
        .await?;

        // A conflicting vacancy keeps its original snippet, even if upstream changed it.
        if let Some(vacancy_id) = outcome.vacancy_id {
            let snippet = record.snippet.as_ref();
            sqlx::query(
                r#"
                INSERT INTO snippets (vacancy_id, requirement, responsibility)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(vacancy_id)
            .bind(snippet.and_then(|s| s.requirement.as_deref()))
            .bind(snippet.and_then(|s| s.responsibility.as_deref()))
            .execute(&mut *conn)
            .await?;
            outcome.snippet_inserted = true;
        } else {
            info!(hh_id = row.hh_id, "Vacancy already stored, skipping");
        }

        Ok(outcome)
    }
}
