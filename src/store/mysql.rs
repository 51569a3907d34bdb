use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use sqlx::MySqlPool;
use tracing::warn;

use crate::model::employee::{ContractWindow, EmployeeContract, WorkDays};
use crate::model::work_record::{Annotation, NewWorkRecord, WorkRecord};
use crate::service::store::{AttendanceStore, EmployeeDirectory, StoreResult};

/// MySQL-backed implementation of the directory and attendance stores.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ContractRow {
    username: String,
    work_days: Option<String>,
    work_start: Option<NaiveTime>,
    work_end: Option<NaiveTime>,
}

impl From<ContractRow> for EmployeeContract {
    fn from(row: ContractRow) -> Self {
        let days = row
            .work_days
            .as_deref()
            .map(WorkDays::parse)
            .unwrap_or_default();
        let window = match (row.work_start, row.work_end) {
            (Some(start), Some(end)) => Some(ContractWindow { start, end }),
            _ => None,
        };
        Self {
            username: row.username,
            days,
            window,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WorkRecordRow {
    id: u64,
    username: String,
    clock_in: DateTime<Utc>,
    clock_out: Option<DateTime<Utc>>,
    total_hours: f64,
    annotation: Option<String>,
    note: Option<String>,
}

impl From<WorkRecordRow> for WorkRecord {
    fn from(row: WorkRecordRow) -> Self {
        let annotation = row.annotation.as_deref().and_then(|code| {
            code.parse::<Annotation>()
                .inspect_err(|_| warn!(code, id = row.id, "unknown annotation code on record"))
                .ok()
        });
        Self {
            id: row.id,
            username: row.username,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            total_hours: row.total_hours,
            annotation,
            note: row.note,
        }
    }
}

const RECORD_COLUMNS: &str = "id, username, clock_in, clock_out, total_hours, annotation, note";

#[async_trait]
impl EmployeeDirectory for MySqlStore {
    async fn contract(&self, username: &str) -> StoreResult<Option<EmployeeContract>> {
        let row = sqlx::query_as::<_, ContractRow>(
            "SELECT username, work_days, work_start, work_end FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn contracted_on(&self, weekday: Weekday) -> StoreResult<Vec<EmployeeContract>> {
        // LIKE is only a prefilter; the parsed day set decides.
        let pattern = format!("%{weekday}%");
        let rows = sqlx::query_as::<_, ContractRow>(
            "SELECT username, work_days, work_start, work_end FROM users WHERE work_days LIKE ?",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(EmployeeContract::from)
            .filter(|c| c.days.contains(weekday))
            .collect())
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find_open_record(&self, username: &str) -> StoreResult<Option<WorkRecord>> {
        let row = sqlx::query_as::<_, WorkRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM work_records \
             WHERE username = ? AND clock_out IS NULL AND annotation IS NULL \
             ORDER BY clock_in DESC LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_record_between(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Option<WorkRecord>> {
        let row = sqlx::query_as::<_, WorkRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM work_records \
             WHERE username = ? AND clock_in >= ? AND clock_in < ? LIMIT 1"
        ))
        .bind(username)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn insert_record(&self, record: &NewWorkRecord) -> StoreResult<u64> {
        let result = sqlx::query(
            "INSERT INTO work_records (username, clock_in, clock_out, total_hours, annotation, note) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.username)
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(record.total_hours)
        .bind(record.annotation.map(|a| a.to_string()))
        .bind(&record.note)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn close_record(
        &self,
        id: u64,
        clock_out: DateTime<Utc>,
        total_hours: f64,
        annotation: Annotation,
    ) -> StoreResult<bool> {
        // The open-row predicate doubles as the race guard: a record already
        // closed by a concurrent clock-out or sweep matches zero rows.
        let result = sqlx::query(
            "UPDATE work_records SET clock_out = ?, total_hours = ?, annotation = ? \
             WHERE id = ? AND clock_out IS NULL AND annotation IS NULL",
        )
        .bind(clock_out)
        .bind(total_hours)
        .bind(annotation.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_absent_record(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM work_records \
             WHERE username = ? AND annotation = ? AND clock_in >= ? AND clock_in < ?",
        )
        .bind(username)
        .bind(Annotation::Absent.to_string())
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn open_records_older_than(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<WorkRecord>> {
        let rows = sqlx::query_as::<_, WorkRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM work_records \
             WHERE clock_out IS NULL AND annotation IS NULL AND clock_in < ?"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
