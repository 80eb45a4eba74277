use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Snippet {
    pub vacancy_id: i32,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}
