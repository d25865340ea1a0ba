//! Assignment repository implementation.
//!
//! Leadership terms live in `department_leadership_terms` (holder reached
//! through `department_heads`), teaching terms in `teaching_terms` (holder
//! reached through `professors`).

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use facet_core::error::{AppError, ErrorKind};
use facet_core::result::AppResult;
use facet_core::types::{AssignmentId, PersonId};
use facet_entity::assignment::{AssignmentKind, AssignmentRef, AssignmentStatus, ExpiringAssignment};
use facet_entity::person::Person;

use crate::store::AssignmentStore;

const LEADERSHIP_EXPIRING: &str = "\
    SELECT t.id, p.id AS person_id, p.first_name, p.last_name, p.email, \
           d.name AS context, NULL::TEXT AS position, t.end_date, t.notified, t.status \
    FROM department_leadership_terms t \
    JOIN department_heads h ON h.id = t.head_id \
    JOIN persons p ON p.id = h.person_id \
    JOIN departments d ON d.id = t.department_id \
    WHERE t.end_date IS NOT NULL AND t.end_date BETWEEN $1 AND $2 \
      AND t.status = 'active' AND t.notified = FALSE \
    ORDER BY t.end_date, t.id";

const TEACHING_EXPIRING: &str = "\
    SELECT t.id, p.id AS person_id, p.first_name, p.last_name, p.email, \
           s.name AS context, t.position, t.end_date, t.notified, t.status \
    FROM teaching_terms t \
    JOIN professors pr ON pr.id = t.professor_id \
    JOIN persons p ON p.id = pr.person_id \
    JOIN subjects s ON s.id = t.subject_id \
    WHERE t.end_date IS NOT NULL AND t.end_date BETWEEN $1 AND $2 \
      AND t.status = 'active' AND t.notified = FALSE \
    ORDER BY t.end_date, t.id";

#[derive(Debug, FromRow)]
struct ExpiringRow {
    id: AssignmentId,
    person_id: PersonId,
    first_name: String,
    last_name: String,
    email: Option<String>,
    context: String,
    position: Option<String>,
    end_date: NaiveDate,
    notified: bool,
    status: AssignmentStatus,
}

impl ExpiringRow {
    fn into_entity(self, kind: AssignmentKind) -> ExpiringAssignment {
        ExpiringAssignment {
            reference: AssignmentRef::new(kind, self.id),
            holder: Person {
                id: self.person_id,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            },
            context: self.context,
            position: self.position,
            end_date: self.end_date,
            notified: self.notified,
            status: self.status,
        }
    }
}

fn table_for(kind: AssignmentKind) -> &'static str {
    match kind {
        AssignmentKind::DepartmentLeadership => "department_leadership_terms",
        AssignmentKind::Teaching => "teaching_terms",
    }
}

/// Repository over both assignment tables.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn find_expiring(
        &self,
        kind: AssignmentKind,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<ExpiringAssignment>> {
        let sql = match kind {
            AssignmentKind::DepartmentLeadership => LEADERSHIP_EXPIRING,
            AssignmentKind::Teaching => TEACHING_EXPIRING,
        };

        let rows = sqlx::query_as::<_, ExpiringRow>(sql)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to query expiring {kind} terms"),
                    e,
                )
            })?;

        Ok(rows.into_iter().map(|r| r.into_entity(kind)).collect())
    }

    async fn mark_notified(&self, reference: AssignmentRef) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET notified = TRUE WHERE id = $1 AND notified = FALSE",
            table_for(reference.kind)
        );

        let result = sqlx::query(&sql)
            .bind(reference.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to flag {reference} as notified"),
                    e,
                )
            })?;

        Ok(result.rows_affected() == 1)
    }
}
