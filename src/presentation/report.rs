use std::future::Future;
use std::io::{BufRead, Write};

use tracing::error;

use crate::error::Result;
use crate::presentation::format::{format_avg_salary, format_companies, format_vacancies};
use crate::presentation::prompt::Prompter;
use crate::services::query_service::QueryService;

/// Runs a query and falls back to the default value on failure, so a broken
/// database connection shows up as an empty report instead of aborting it.
pub async fn or_empty<T, F>(what: &str, query: F) -> T
where
    T: Default,
    F: Future<Output = Result<T>>,
{
    match query.await {
        Ok(value) => value,
        Err(err) => {
            error!(query = what, error = %err, "Query failed, showing empty result");
            T::default()
        }
    }
}

/// The interactive y/n walk through the stored data.
pub async fn run_interactive<R: BufRead, W: Write>(
    queries: &QueryService,
    employer_ids: &[String],
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let companies = or_empty(
        "companies_and_vacancies_count",
        queries.companies_and_vacancies_count(employer_ids),
    )
    .await;
    if prompter.confirm("Show the tracked companies?")? {
        prompter.say(&format_companies(&companies))?;
    }

    let all = or_empty("all_vacancies", queries.all_vacancies()).await;
    if prompter.confirm("Show all vacancies?")? {
        prompter.say(&format_vacancies(&all))?;
    }

    let average = or_empty("avg_salary", queries.avg_salary()).await;
    if prompter.confirm("Show the average salary?")? {
        prompter.say(&format_avg_salary(average))?;
    }

    let higher = or_empty(
        "vacancies_with_higher_salary",
        queries.vacancies_with_higher_salary(),
    )
    .await;
    if prompter.confirm("Show vacancies paying above average?")? {
        prompter.say("\nVacancies with above-average salary:")?;
        prompter.say(&format_vacancies(&higher))?;
    }

    let keyword = prompter.ask("Enter a keyword")?;
    let matches = or_empty(
        "vacancies_with_keyword",
        queries.vacancies_with_keyword(&keyword),
    )
    .await;
    prompter.say(&format!("\nVacancies matching {:?}:", keyword))?;
    prompter.say(&format_vacancies(&matches))?;

    Ok(())
}
