//! Person repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use facet_core::error::{AppError, ErrorKind};
use facet_core::result::AppResult;
use facet_core::types::PersonId;
use facet_entity::person::Person;

use crate::store::PersonStore;

/// Read-only access to the `persons` table.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    /// Create a new person repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PersonRepository {
    async fn find_by_id(&self, id: PersonId) -> AppResult<Option<Person>> {
        sqlx::query_as::<_, Person>(
            "SELECT id, first_name, last_name, email FROM persons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find person", e))
    }
}
