use serde_json::Value as JsonValue;
use std::fmt::Write;

use crate::models::employer::EmployerVacancyCount;
use crate::models::vacancy::{SalaryView, VacancyListing};

pub const NOT_SPECIFIED: &str = "not specified";
const SEPARATOR: &str = "-----------------------------------";

/// `"from - to currency"`, a single amount when both ends match, and
/// `not specified` in place of anything missing.
pub fn format_salary(salary: Option<&JsonValue>) -> String {
    let Some(view) = salary.and_then(SalaryView::new) else {
        return NOT_SPECIFIED.to_string();
    };

    let from = view.lower_bound().map(scalar_text);
    let to = view.upper_bound().map(scalar_text);
    let currency = view
        .currency()
        .map(scalar_text)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    match (from, to) {
        (Some(from), Some(to)) if from == to => format!("{} {}", from, currency),
        (from, to) => format!(
            "{} - {} {}",
            from.as_deref().unwrap_or(NOT_SPECIFIED),
            to.as_deref().unwrap_or(NOT_SPECIFIED),
            currency
        ),
    }
}

pub fn format_companies(companies: &[EmployerVacancyCount]) -> String {
    let mut out = String::from("\nCompanies and vacancy counts:\n");
    for company in companies {
        let _ = writeln!(
            out,
            "Company: {} - {} vacancies",
            company.company_name.as_deref().unwrap_or(NOT_SPECIFIED),
            company.vacancies_count
        );
    }
    out
}

pub fn format_vacancies(vacancies: &[VacancyListing]) -> String {
    let mut out = String::from("\nVacancies:\n");
    for vacancy in vacancies {
        let _ = writeln!(
            out,
            "Company: {}",
            vacancy.company_name.as_deref().unwrap_or(NOT_SPECIFIED)
        );
        let _ = writeln!(
            out,
            "Vacancy: {}",
            vacancy.vacancy_name.as_deref().unwrap_or(NOT_SPECIFIED)
        );
        let _ = writeln!(out, "Salary: {}", format_salary(vacancy.salary.as_ref()));
        let _ = writeln!(
            out,
            "Link: {}",
            vacancy.url.as_deref().unwrap_or(NOT_SPECIFIED)
        );
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

pub fn format_avg_salary(average: f64) -> String {
    format!("\nAverage salary across all vacancies: {:.2} RUB", average)
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn salary_range() {
        let salary = json!({ "from": 100000, "to": 150000, "currency": "RUR" });
        assert_eq!(format_salary(Some(&salary)), "100000 - 150000 RUR");
    }

    #[test]
    fn salary_single_amount() {
        let salary = json!({ "from": 90000, "to": 90000, "currency": "RUR" });
        assert_eq!(format_salary(Some(&salary)), "90000 RUR");
    }

    #[test]
    fn salary_missing_parts() {
        assert_eq!(format_salary(None), NOT_SPECIFIED);
        assert_eq!(format_salary(Some(&JsonValue::Null)), NOT_SPECIFIED);
        assert_eq!(format_salary(Some(&json!({}))), NOT_SPECIFIED);

        let open_ended = json!({ "from": 120000, "to": null, "currency": "USD" });
        assert_eq!(
            format_salary(Some(&open_ended)),
            "120000 - not specified USD"
        );
    }

    #[test]
    fn companies_block() {
        let text = format_companies(&[
            EmployerVacancyCount {
                company_name: Some("Drom".into()),
                vacancies_count: 5,
            },
            EmployerVacancyCount {
                company_name: Some("Teyca".into()),
                vacancies_count: 0,
            },
        ]);
        assert!(text.contains("Company: Drom - 5 vacancies\n"));
        assert!(text.contains("Company: Teyca - 0 vacancies\n"));
    }

    #[test]
    fn vacancies_block() {
        let text = format_vacancies(&[VacancyListing {
            company_name: Some("Udevs".into()),
            vacancy_name: Some("Rust Developer".into()),
            salary: None,
            url: Some("https://api.hh.ru/vacancies/1".into()),
        }]);
        assert!(text.contains("Vacancy: Rust Developer\n"));
        assert!(text.contains("Salary: not specified\n"));
        assert!(text.ends_with(&format!("{}\n", SEPARATOR)));
    }

    #[test]
    fn average_is_rounded() {
        assert_eq!(
            format_avg_salary(133333.3333),
            "\nAverage salary across all vacancies: 133333.33 RUB"
        );
    }
}
