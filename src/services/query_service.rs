use sqlx::PgPool;
use tracing::instrument;

use crate::error::Result;
use crate::models::employer::EmployerVacancyCount;
use crate::models::vacancy::VacancyListing;

#[derive(Clone)]
pub struct QueryService {
    pool: PgPool,
}

impl QueryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vacancy count per requested employer, employers without vacancies included.
    #[instrument(skip(self, employer_ids), fields(employers = employer_ids.len()))]
    pub async fn companies_and_vacancies_count(
        &self,
        employer_ids: &[String],
    ) -> Result<Vec<EmployerVacancyCount>> {
        if employer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, EmployerVacancyCount>(
            r#"
            SELECT
                e.name AS company_name,
                COUNT(v.id) AS vacancies_count
            FROM employers e
            LEFT JOIN vacancies v ON e.id = v.employer_id
            WHERE e.id = ANY($1)
            GROUP BY e.id, e.name
            ORDER BY vacancies_count DESC, e.name ASC
            "#,
        )
        .bind(employer_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        let rows = sqlx::query_as::<_, VacancyListing>(
            r#"
            SELECT
                e.name AS company_name,
                v.name AS vacancy_name,
                v.salary,
                v.url
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.id
            ORDER BY e.name ASC, v.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Mean of `salary.from` over vacancies that have it; `0.0` when none do.
    #[instrument(skip(self))]
    pub async fn avg_salary(&self) -> Result<f64> {
        Ok(self.average_salary_from().await?.unwrap_or(0.0))
    }

    /// Vacancies whose `salary.from` is above the current average.
    ///
    /// The average is queried separately right before the filter, so a write
    /// landing in between is visible to one query and not the other.
    #[instrument(skip(self))]
    pub async fn vacancies_with_higher_salary(&self) -> Result<Vec<VacancyListing>> {
        let average = self.average_salary_from().await?.unwrap_or(0.0);

        let rows = sqlx::query_as::<_, VacancyListing>(
            r#"
            SELECT
                e.name AS company_name,
                v.name AS vacancy_name,
                v.salary,
                v.url
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.id
            WHERE (v.salary->>'from')::float8 > $1
            ORDER BY (v.salary->>'from')::float8 DESC, v.id ASC
            "#,
        )
        .bind(average)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Case-insensitive substring match on the vacancy name. An empty keyword
    /// matches every vacancy.
    #[instrument(skip(self))]
    pub async fn vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<VacancyListing>> {
        let rows = sqlx::query_as::<_, VacancyListing>(
            r#"
            SELECT
                e.name AS company_name,
                v.name AS vacancy_name,
                v.salary,
                v.url
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.id
            WHERE strpos(LOWER(v.name), LOWER($1)) > 0
            ORDER BY e.name ASC, v.id ASC
            "#,
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // float8 keeps amounts of any magnitude decodable.
    async fn average_salary_from(&self) -> Result<Option<f64>> {
        let average = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG((salary->>'from')::float8)
            FROM vacancies
            WHERE salary->>'from' IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(average)
    }
}
