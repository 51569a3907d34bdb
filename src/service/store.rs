use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};

use crate::model::employee::EmployeeContract;
use crate::model::work_record::{Annotation, NewWorkRecord, WorkRecord};

pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Read-only view of the employee directory.
#[async_trait]
pub trait EmployeeDirectory {
    async fn contract(&self, username: &str) -> StoreResult<Option<EmployeeContract>>;

    /// All employees whose contract weekdays include `weekday`.
    async fn contracted_on(&self, weekday: Weekday) -> StoreResult<Vec<EmployeeContract>>;
}

/// Persistence operations the attendance lifecycle needs.
///
/// `close_record` must only touch a row that is still open (no clock-out, no
/// annotation) and report whether it did; that guard is what keeps a live
/// clock-out and the abandoned-session sweep from both closing one record.
#[async_trait]
pub trait AttendanceStore {
    /// Most recent open record for the employee, ignoring annotated rows.
    async fn find_open_record(&self, username: &str) -> StoreResult<Option<WorkRecord>>;

    /// Any record (open, closed or absent) clocked in within `[from, to)`.
    async fn find_record_between(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Option<WorkRecord>>;

    async fn insert_record(&self, record: &NewWorkRecord) -> StoreResult<u64>;

    /// Closes the record if and only if it is still open. Returns whether a
    /// row was updated.
    async fn close_record(
        &self,
        id: u64,
        clock_out: DateTime<Utc>,
        total_hours: f64,
        annotation: Annotation,
    ) -> StoreResult<bool>;

    /// Removes ABSENT placeholders for the employee clocked in within
    /// `[from, to)`. Returns the number of rows deleted.
    async fn delete_absent_record(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Open records whose clock-in is strictly before `cutoff`.
    async fn open_records_older_than(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<WorkRecord>>;
}
