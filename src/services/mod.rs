pub mod hh_service;
pub mod ingest_service;
pub mod query_service;
pub mod schema_service;
pub mod writer_service;
