use crate::config::DatabaseSettings;
use crate::error::Result;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::time::Duration;

/// Maintenance database used for `CREATE DATABASE` / `DROP DATABASE`.
pub const ADMIN_DATABASE: &str = "postgres";

pub fn connect_options(settings: &DatabaseSettings, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(database)
        .application_name("hh-vacancies")
}

pub async fn connect_admin(settings: &DatabaseSettings) -> Result<PgConnection> {
    let conn = connect_options(settings, ADMIN_DATABASE).connect().await?;
    Ok(conn)
}

/// All reads and writes in a run go through one connection.
pub async fn create_pool(settings: &DatabaseSettings, database: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(connect_options(settings, database))
        .await?;
    Ok(pool)
}

/// Pool that only connects on first use.
pub fn create_lazy_pool(settings: &DatabaseSettings, database: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect_lazy_with(connect_options(settings, database))
}
