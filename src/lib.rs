pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod presentation;
pub mod services;
pub mod utils;

use crate::services::{query_service::QueryService, writer_service::VacancyWriter};
use sqlx::PgPool;

/// Services bound to the target database for one run.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub writer: VacancyWriter,
    pub queries: QueryService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let writer = VacancyWriter::new(pool.clone());
        let queries = QueryService::new(pool.clone());

        Self {
            pool,
            writer,
            queries,
        }
    }

    /// Closes the pool; every connection is returned and shut down.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
