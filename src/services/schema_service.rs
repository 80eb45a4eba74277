use sqlx::postgres::PgConnection;
use sqlx::{ConnectOptions, Connection};
use tracing::{error, info, instrument};

use crate::config::DatabaseSettings;
use crate::database::pool::{connect_admin, connect_options};
use crate::error::{Error, Result};

/// Table DDL in foreign-key order: employers, vacancies, snippets.
pub const SCHEMA_STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS employers (
        id VARCHAR(255) PRIMARY KEY,
        name VARCHAR(255),
        url VARCHAR(255),
        alternate_url VARCHAR(255),
        logo_urls JSONB
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vacancies (
        id SERIAL PRIMARY KEY,
        hh_id VARCHAR(255) UNIQUE,
        name VARCHAR(255),
        employer_id VARCHAR(255) REFERENCES employers(id),
        salary JSONB,
        description TEXT,
        url VARCHAR(255),
        created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
        published_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS snippets (
        vacancy_id INT PRIMARY KEY REFERENCES vacancies(id),
        requirement TEXT,
        responsibility TEXT
    )
    "#,
];

#[derive(Clone)]
pub struct SchemaService {
    settings: DatabaseSettings,
}

impl SchemaService {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    /// Drops `name` if it exists, creates it again and creates the tables.
    /// Everything previously stored under `name` is lost.
    #[instrument(skip(self))]
    pub async fn provision(&self, name: &str) -> Result<()> {
        let result = self.provision_inner(name).await;
        match &result {
            Ok(()) => info!(database = name, "Database provisioned"),
            Err(err) => error!(database = name, error = %err, "Failed to provision database"),
        }
        result
    }

    async fn provision_inner(&self, name: &str) -> Result<()> {
        let ident = quote_ident(name)?;

        let mut admin = connect_admin(&self.settings).await?;
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(name)
                .fetch_optional(&mut admin)
                .await?;
        if exists.is_some() {
            info!(database = name, "Dropping existing database");
            sqlx::query(&format!("DROP DATABASE {}", ident))
                .execute(&mut admin)
                .await?;
        }
        sqlx::query(&format!("CREATE DATABASE {}", ident))
            .execute(&mut admin)
            .await?;
        admin.close().await?;

        let mut conn = connect_options(&self.settings, name).connect().await?;
        create_tables(&mut conn).await?;
        conn.close().await?;

        Ok(())
    }
}

pub async fn create_tables(conn: &mut PgConnection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Public tables in the connected database, sorted by name.
pub async fn table_names(conn: &mut PgConnection) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT tablename::text
        FROM pg_catalog.pg_tables
        WHERE schemaname = 'public'
        ORDER BY tablename
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(names)
}

/// Quotes a database name for DDL, where bind parameters are not allowed.
pub fn quote_ident(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::Config("Database name must not be empty".to_string()));
    }
    if name.contains('\0') {
        return Err(Error::Config(
            "Database name must not contain NUL bytes".to_string(),
        ));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_and_hostile_names() {
        assert_eq!(quote_ident("vacancies").unwrap(), "\"vacancies\"");
        assert_eq!(
            quote_ident("x\"; DROP DATABASE postgres; --").unwrap(),
            "\"x\"\"; DROP DATABASE postgres; --\""
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert!(quote_ident("").is_err());
        assert!(quote_ident("   ").is_err());
    }

    #[test]
    fn tables_are_created_parent_first() {
        let order: Vec<&str> = SCHEMA_STATEMENTS
            .iter()
            .map(|ddl| {
                ddl.split_whitespace()
                    .nth(5)
                    .expect("CREATE TABLE IF NOT EXISTS <name>")
            })
            .collect();
        assert_eq!(order, vec!["employers", "vacancies", "snippets"]);
    }
}
