use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

/// Fixed civil-time offset for the deployment (the origin site runs at +09:00).
///
/// Instants are stored and compared in UTC everywhere; this is the single
/// place where a calendar date, time-of-day or weekday is derived from one.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    /// Builds a clock for a whole-hour offset east of UTC. Returns `None`
    /// when the offset is out of chrono's ±24h range.
    pub fn from_east_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(|offset| Self { offset })
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date_naive()
    }

    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        self.to_local(instant).time()
    }

    /// The UTC instant at which `time` occurs on the local calendar `date`.
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(self.offset.local_minus_utc()))))
    }

    /// Half-open UTC range `[start, end)` covering the local calendar `date`.
    pub fn day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.instant_at(date, NaiveTime::MIN);
        (start, start + Duration::days(1))
    }
}

pub fn duration_hours(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 / 3600.0
}

/// Billing granularity rounding. Not standard rounding: the fractional part
/// buckets at 0.25/0.75, both boundaries falling into the lower bucket.
///
///   f <= 0.25        -> floor
///   0.25 < f <= 0.75 -> floor + 0.5
///   f > 0.75         -> ceil
pub fn round_to_half_hour(hours: f64) -> f64 {
    let whole = hours.floor();
    let frac = hours - whole;
    if frac <= 0.25 {
        whole
    } else if frac <= 0.75 {
        whole + 0.5
    } else {
        hours.ceil()
    }
}
