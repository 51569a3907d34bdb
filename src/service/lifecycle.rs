use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::{error, info, warn};

use crate::model::work_record::{Annotation, NewWorkRecord, WorkRecord};
use crate::service::clock::{LocalClock, duration_hours};
use crate::service::reconcile::reconcile_shift;
use crate::service::store::{AttendanceStore, EmployeeDirectory};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("no open attendance record for {0}")]
    NoOpenRecord(String),

    #[error("no contract window on file for {0}")]
    NoContractWindow(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Business policy knobs. `min_shift_minutes = 0` disables the early
/// clock-out guard, which is the origin deployment's setting.
#[derive(Debug, Clone, Copy)]
pub struct LifecyclePolicy {
    pub min_shift_minutes: i64,
    pub stale_shift_hours: i64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            min_shift_minutes: 0,
            stale_shift_hours: 8,
        }
    }
}

#[derive(Debug)]
pub enum ClockInOutcome {
    Recorded(WorkRecord),
    /// Today is not one of the employee's contract weekdays. A soft
    /// rejection, not an error.
    NotContractDay,
    AlreadyClockedIn,
}

#[derive(Debug)]
pub enum ClockOutOutcome {
    Closed(WorkRecord),
    /// The configured minimum shift length has not elapsed yet.
    TooEarly,
}

/// Aggregate result of one sweep pass. Per-item failures never abort the
/// rest of the batch; they are counted here and logged in place.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub applied: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// State machine for one attendance record: open on clock-in, closed and
/// annotated on clock-out, with two corrective sweeps for days that never
/// opened (absentees) and shifts that never closed (abandoned sessions).
#[derive(Clone)]
pub struct AttendanceLifecycle<S> {
    store: S,
    clock: LocalClock,
    policy: LifecyclePolicy,
}

impl<S> AttendanceLifecycle<S>
where
    S: AttendanceStore + EmployeeDirectory,
{
    pub fn new(store: S, clock: LocalClock, policy: LifecyclePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn clock(&self) -> LocalClock {
        self.clock
    }

    /// Opens a shift for the employee at `now`.
    ///
    /// A successful clock-in also retracts an ABSENT placeholder the
    /// absentee sweep may have written earlier the same day. The retraction
    /// runs after the insert so a failure cannot lose the live record; the
    /// leftover placeholder is tolerated and cleaned up administratively.
    pub async fn clock_in(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<ClockInOutcome, LifecycleError> {
        let contract = self
            .store
            .contract(username)
            .await?
            .ok_or_else(|| LifecycleError::EmployeeNotFound(username.to_owned()))?;

        let today = self.clock.local_date(now);
        if !contract.days.contains(today.weekday()) || contract.window.is_none() {
            return Ok(ClockInOutcome::NotContractDay);
        }

        if self.store.find_open_record(username).await?.is_some() {
            return Ok(ClockInOutcome::AlreadyClockedIn);
        }

        let record = NewWorkRecord::open(username, now);
        let id = self.store.insert_record(&record).await?;

        let (day_start, day_end) = self.clock.day_bounds(today);
        match self
            .store
            .delete_absent_record(username, day_start, day_end)
            .await
        {
            Ok(deleted) if deleted > 0 => {
                info!(username, "late clock-in retracted an absence record");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, username, "failed to retract absence record"),
        }

        Ok(ClockInOutcome::Recorded(record.with_id(id)))
    }

    /// Closes the employee's open shift at `now`, reconciling billable hours
    /// and the annotation against the contract window of the clock-in date.
    pub async fn clock_out(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<ClockOutOutcome, LifecycleError> {
        let contract = self
            .store
            .contract(username)
            .await?
            .ok_or_else(|| LifecycleError::EmployeeNotFound(username.to_owned()))?;

        let open = self
            .store
            .find_open_record(username)
            .await?
            .ok_or_else(|| LifecycleError::NoOpenRecord(username.to_owned()))?;

        if self.policy.min_shift_minutes > 0
            && now - open.clock_in < Duration::minutes(self.policy.min_shift_minutes)
        {
            return Ok(ClockOutOutcome::TooEarly);
        }

        let window = contract
            .window
            .ok_or_else(|| LifecycleError::NoContractWindow(username.to_owned()))?;

        let outcome = reconcile_shift(&self.clock, open.clock_in, now, &window);
        if outcome.clamped {
            warn!(
                username,
                record = open.id,
                "clock-out preceded the shift base; billing zero hours"
            );
        }

        let closed = self
            .store
            .close_record(open.id, now, outcome.total_hours, outcome.annotation)
            .await?;
        if !closed {
            // Lost the race against a sweep or a concurrent clock-out.
            return Err(LifecycleError::NoOpenRecord(username.to_owned()));
        }

        let mut record = open;
        record.clock_out = Some(now);
        record.total_hours = outcome.total_hours;
        record.annotation = Some(outcome.annotation);
        Ok(ClockOutOutcome::Closed(record))
    }

    /// Whether the employee has an open shift on the given local date.
    pub async fn is_clocked_in(
        &self,
        username: &str,
        date: NaiveDate,
    ) -> Result<bool, LifecycleError> {
        let open = self.store.find_open_record(username).await?;
        Ok(open.is_some_and(|r| self.clock.local_date(r.clock_in) == date))
    }

    /// Marks every employee contracted today, whose shift end has already
    /// passed and who produced no record at all, as absent. Idempotent: an
    /// existing record of any kind (open, closed or absent) skips the
    /// employee.
    pub async fn sweep_absentees(&self, now: DateTime<Utc>) -> Result<SweepReport, LifecycleError> {
        let today = self.clock.local_date(now);
        let local_time = self.clock.local_time(now);
        let employees = self.store.contracted_on(today.weekday()).await?;
        let (day_start, day_end) = self.clock.day_bounds(today);

        let mut report = SweepReport::default();
        for employee in employees {
            let Some(window) = employee.window else {
                report.skipped += 1;
                continue;
            };
            if local_time < window.end {
                // Shift still in progress; they may yet clock in late.
                report.skipped += 1;
                continue;
            }

            match self.mark_absent(&employee.username, day_start, day_end).await {
                Ok(true) => report.applied += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    error!(error = %e, username = %employee.username, "absentee sweep failed for employee");
                    report.failed += 1;
                }
            }
        }

        info!(
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            date = %today,
            "absentee sweep finished"
        );
        Ok(report)
    }

    async fn mark_absent(
        &self,
        username: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        if self
            .store
            .find_record_between(username, day_start, day_end)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        self.store
            .insert_record(&NewWorkRecord::absent(username, day_start))
            .await?;
        Ok(true)
    }

    /// Force-closes every open record older than the stale threshold with
    /// full contracted credit and a MISSED_CLOCKOUT annotation. The decision
    /// table is deliberately bypassed: a missing button press is flagged for
    /// review, not penalized.
    pub async fn sweep_abandoned(&self, now: DateTime<Utc>) -> Result<SweepReport, LifecycleError> {
        let cutoff = now - Duration::hours(self.policy.stale_shift_hours);
        let records = self.store.open_records_older_than(cutoff).await?;

        let mut report = SweepReport::default();
        for record in records {
            match self.force_close(&record).await {
                Ok(true) => report.applied += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    error!(error = %e, record = record.id, username = %record.username, "abandoned sweep failed for record");
                    report.failed += 1;
                }
            }
        }

        info!(
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            "abandoned-session sweep finished"
        );
        Ok(report)
    }

    async fn force_close(&self, record: &WorkRecord) -> Result<bool, LifecycleError> {
        if !record.is_open() {
            return Ok(false);
        }
        let Some(contract) = self.store.contract(&record.username).await? else {
            warn!(record = record.id, username = %record.username, "open record for unknown employee");
            return Ok(false);
        };
        let Some(window) = contract.window else {
            warn!(record = record.id, username = %record.username, "open record without a contract window");
            return Ok(false);
        };

        let date = self.clock.local_date(record.clock_in);
        let contract_start = self.clock.instant_at(date, window.start);
        let contract_end = self.clock.instant_at(date, window.end);
        let total_hours = duration_hours(contract_end - contract_start).max(0.0);

        Ok(self
            .store
            .close_record(record.id, contract_end, total_hours, Annotation::MissedClockout)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveTime, Weekday};

    use crate::model::employee::{ContractWindow, EmployeeContract, WorkDays};
    use crate::service::store::StoreResult;

    #[derive(Default)]
    struct MemStore {
        employees: Mutex<HashMap<String, EmployeeContract>>,
        records: Mutex<Vec<WorkRecord>>,
        next_id: AtomicU64,
        fail_inserts: AtomicBool,
        /// One-shot: close the looked-up open record right after returning
        /// it, simulating a sweep that wins the race.
        close_after_lookup: AtomicBool,
    }

    impl MemStore {
        fn add_employee(&self, username: &str, days: &str, start: (u32, u32), end: (u32, u32)) {
            let contract = EmployeeContract {
                username: username.to_owned(),
                days: WorkDays::parse(days),
                window: Some(ContractWindow {
                    start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                    end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
                }),
            };
            self.employees
                .lock()
                .unwrap()
                .insert(username.to_owned(), contract);
        }

        fn records(&self) -> Vec<WorkRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeDirectory for Arc<MemStore> {
        async fn contract(&self, username: &str) -> StoreResult<Option<EmployeeContract>> {
            Ok(self.employees.lock().unwrap().get(username).cloned())
        }

        async fn contracted_on(&self, weekday: Weekday) -> StoreResult<Vec<EmployeeContract>> {
            Ok(self
                .employees
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.days.contains(weekday))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl AttendanceStore for Arc<MemStore> {
        async fn find_open_record(&self, username: &str) -> StoreResult<Option<WorkRecord>> {
            let open = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.username == username && r.is_open())
                .max_by_key(|r| r.clock_in)
                .cloned();
            if let Some(record) = &open {
                if self.close_after_lookup.swap(false, Ordering::SeqCst) {
                    self.close_record(
                        record.id,
                        record.clock_in + Duration::hours(8),
                        8.0,
                        Annotation::MissedClockout,
                    )
                    .await?;
                }
            }
            Ok(open)
        }

        async fn find_record_between(
            &self,
            username: &str,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> StoreResult<Option<WorkRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.username == username && r.clock_in >= from && r.clock_in < to)
                .cloned())
        }

        async fn insert_record(&self, record: &NewWorkRecord) -> StoreResult<u64> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(sqlx::Error::Protocol("injected insert failure".into()));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.records
                .lock()
                .unwrap()
                .push(record.clone().with_id(id));
            Ok(id)
        }

        async fn close_record(
            &self,
            id: u64,
            clock_out: DateTime<Utc>,
            total_hours: f64,
            annotation: Annotation,
        ) -> StoreResult<bool> {
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.id == id && r.is_open()) {
                Some(record) => {
                    record.clock_out = Some(clock_out);
                    record.total_hours = total_hours;
                    record.annotation = Some(annotation);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete_absent_record(
            &self,
            username: &str,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> StoreResult<u64> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| {
                !(r.username == username
                    && r.annotation == Some(Annotation::Absent)
                    && r.clock_in >= from
                    && r.clock_in < to)
            });
            Ok((before - records.len()) as u64)
        }

        async fn open_records_older_than(
            &self,
            cutoff: DateTime<Utc>,
        ) -> StoreResult<Vec<WorkRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.is_open() && r.clock_in < cutoff)
                .cloned()
                .collect())
        }
    }

    fn kst() -> LocalClock {
        LocalClock::from_east_hours(9).unwrap()
    }

    /// Local wall-clock instant on 2026-03-02, a Monday.
    fn monday(hour: u32, min: u32) -> DateTime<Utc> {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        kst().instant_at(date, NaiveTime::from_hms_opt(hour, min, 0).unwrap())
    }

    fn lifecycle(store: &Arc<MemStore>) -> AttendanceLifecycle<Arc<MemStore>> {
        AttendanceLifecycle::new(store.clone(), kst(), LifecyclePolicy::default())
    }

    #[actix_web::test]
    async fn clock_in_opens_a_shift() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon,Tue", (9, 0), (17, 0));

        let outcome = lifecycle(&store).clock_in("alice01", monday(9, 0)).await.unwrap();
        let ClockInOutcome::Recorded(record) = outcome else {
            panic!("expected a recorded clock-in, got {outcome:?}");
        };
        assert!(record.is_open());
        assert_eq!(record.clock_in, monday(9, 0));
        assert_eq!(store.records().len(), 1);
    }

    #[actix_web::test]
    async fn clock_in_rejects_a_non_contract_day() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Tue,Wed", (9, 0), (17, 0));

        let outcome = lifecycle(&store).clock_in("alice01", monday(9, 0)).await.unwrap();
        assert!(matches!(outcome, ClockInOutcome::NotContractDay));
        assert!(store.records().is_empty());
    }

    #[actix_web::test]
    async fn clock_in_rejects_a_second_open_shift() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        let outcome = lifecycle.clock_in("alice01", monday(9, 5)).await.unwrap();
        assert!(matches!(outcome, ClockInOutcome::AlreadyClockedIn));
        assert_eq!(store.records().len(), 1);
    }

    #[actix_web::test]
    async fn clock_in_fails_for_unknown_employee() {
        let store = Arc::new(MemStore::default());
        let err = lifecycle(&store)
            .clock_in("ghost", monday(9, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::EmployeeNotFound(_)));
    }

    #[actix_web::test]
    async fn late_clock_in_retracts_an_absence_record() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        // Absent placeholder left by an earlier sweep.
        let (day_start, _) = kst().day_bounds(chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        store
            .insert_record(&NewWorkRecord::absent("alice01", day_start))
            .await
            .unwrap();

        lifecycle.clock_in("alice01", monday(13, 0)).await.unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_open());
    }

    #[actix_web::test]
    async fn clock_out_without_an_open_shift_fails() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));

        let err = lifecycle(&store)
            .clock_out("alice01", monday(17, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NoOpenRecord(_)));
    }

    #[actix_web::test]
    async fn clock_out_reconciles_and_closes() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(8, 55)).await.unwrap();
        let outcome = lifecycle.clock_out("alice01", monday(17, 10)).await.unwrap();

        let ClockOutOutcome::Closed(record) = outcome else {
            panic!("expected a closed shift, got {outcome:?}");
        };
        assert_eq!(record.total_hours, 8.0);
        assert_eq!(record.annotation, Some(Annotation::OnTime));

        let stored = &store.records()[0];
        assert!(!stored.is_open());
        assert_eq!(stored.total_hours, 8.0);
        assert_eq!(stored.annotation, Some(Annotation::OnTime));
    }

    #[actix_web::test]
    async fn clock_out_respects_the_minimum_shift_guard() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let policy = LifecyclePolicy {
            min_shift_minutes: 60,
            ..LifecyclePolicy::default()
        };
        let lifecycle = AttendanceLifecycle::new(store.clone(), kst(), policy);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        let outcome = lifecycle.clock_out("alice01", monday(9, 30)).await.unwrap();
        assert!(matches!(outcome, ClockOutOutcome::TooEarly));
        assert!(store.records()[0].is_open());
    }

    #[actix_web::test]
    async fn clock_out_losing_the_race_reads_as_no_open_record() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();

        // A sweep closes the shift between the lookup and the close.
        store.close_after_lookup.store(true, Ordering::SeqCst);
        let err = lifecycle
            .clock_out("alice01", monday(16, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NoOpenRecord(_)));

        // The sweep's closure stands; the losing clock-out changed nothing.
        let record = &store.records()[0];
        assert_eq!(record.annotation, Some(Annotation::MissedClockout));
        assert_eq!(record.clock_out, Some(monday(17, 0)));
        assert_eq!(record.total_hours, 8.0);
    }

    #[actix_web::test]
    async fn clock_out_after_a_sweep_already_closed_the_shift_fails() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        lifecycle.sweep_abandoned(monday(18, 0)).await.unwrap();

        let err = lifecycle
            .clock_out("alice01", monday(18, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NoOpenRecord(_)));

        let record = &store.records()[0];
        assert_eq!(record.annotation, Some(Annotation::MissedClockout));
        assert_eq!(record.clock_out, Some(monday(17, 0)));
    }

    #[actix_web::test]
    async fn status_reflects_the_open_shift_on_its_local_day() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        assert!(!lifecycle.is_clocked_in("alice01", date).await.unwrap());
        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        assert!(lifecycle.is_clocked_in("alice01", date).await.unwrap());
        assert!(
            !lifecycle
                .is_clocked_in("alice01", date.succ_opt().unwrap())
                .await
                .unwrap()
        );
    }

    #[actix_web::test]
    async fn absentee_sweep_marks_a_missing_employee() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));

        let report = lifecycle(&store).sweep_absentees(monday(18, 0)).await.unwrap();
        assert_eq!(report.applied, 1);

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].annotation, Some(Annotation::Absent));
        assert_eq!(records[0].total_hours, 0.0);
        assert!(records[0].clock_out.is_none());
        // Clock-in sits at local midnight.
        assert_eq!(kst().local_time(records[0].clock_in), NaiveTime::MIN);
    }

    #[actix_web::test]
    async fn absentee_sweep_is_idempotent() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.sweep_absentees(monday(18, 0)).await.unwrap();
        let second = lifecycle.sweep_absentees(monday(18, 30)).await.unwrap();
        assert_eq!(second.applied, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(store.records().len(), 1);
    }

    #[actix_web::test]
    async fn absentee_sweep_waits_for_the_shift_end() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));

        let report = lifecycle(&store).sweep_absentees(monday(12, 0)).await.unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 1);
        assert!(store.records().is_empty());
    }

    #[actix_web::test]
    async fn absentee_sweep_skips_employees_with_any_record() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        lifecycle.clock_out("alice01", monday(17, 0)).await.unwrap();

        let report = lifecycle.sweep_absentees(monday(18, 0)).await.unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(store.records().len(), 1);
    }

    #[actix_web::test]
    async fn absentee_sweep_isolates_per_employee_failures() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        store.add_employee("bob02", "Mon", (9, 0), (17, 0));
        store.fail_inserts.store(true, Ordering::SeqCst);

        let report = lifecycle(&store).sweep_absentees(monday(18, 0)).await.unwrap();
        // Both inserts fail, and both are attempted: one failure does not
        // abort the batch.
        assert_eq!(report.failed, 2);
    }

    #[actix_web::test]
    async fn abandoned_sweep_force_closes_a_stale_shift() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        let report = lifecycle.sweep_abandoned(monday(18, 0)).await.unwrap();
        assert_eq!(report.applied, 1);

        let record = &store.records()[0];
        assert_eq!(record.annotation, Some(Annotation::MissedClockout));
        assert_eq!(record.total_hours, 8.0);
        // Closed at the contract end, not at sweep time.
        assert_eq!(record.clock_out, Some(monday(17, 0)));
    }

    #[actix_web::test]
    async fn abandoned_sweep_leaves_fresh_shifts_open() {
        let store = Arc::new(MemStore::default());
        store.add_employee("alice01", "Mon", (9, 0), (17, 0));
        let lifecycle = lifecycle(&store);

        lifecycle.clock_in("alice01", monday(9, 0)).await.unwrap();
        let report = lifecycle.sweep_abandoned(monday(11, 0)).await.unwrap();
        assert_eq!(report.applied, 0);
        assert!(store.records()[0].is_open());
    }

    #[actix_web::test]
    async fn abandoned_sweep_skips_records_without_a_directory_entry() {
        let store = Arc::new(MemStore::default());
        store
            .insert_record(&NewWorkRecord::open("ghost", monday(1, 0)))
            .await
            .unwrap();

        let report = lifecycle(&store).sweep_abandoned(monday(18, 0)).await.unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 1);
        assert!(store.records()[0].is_open());
    }
}
