//! Calendar arithmetic pinned to the studio's time zone.
//!
//! Every conversion between an absolute instant and studio wall time goes
//! through [`StudioClock`]. The free helpers below only ever see naive
//! studio-local dates, so a visitor's own locale never leaks into slot
//! hours or month boundaries.

use chrono::{
    DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Zone the studio takes appointments in.
pub const STUDIO_TIMEZONE: Tz = chrono_tz::Australia::Melbourne;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioClock {
    tz: Tz,
}

impl Default for StudioClock {
    fn default() -> Self {
        Self::new(STUDIO_TIMEZONE)
    }
}

impl StudioClock {
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Current studio wall time.
    pub fn now_local(&self) -> NaiveDateTime {
        self.now().naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Attach the studio zone to a wall-clock time.
    ///
    /// Times repeated by a DST fall-back resolve to the earlier instant;
    /// times skipped by a spring-forward move past the gap.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(at) => at,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.tz.from_utc_datetime(&naive)),
        }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Move by whole calendar months, clamping the day to the target month's
/// length (31 January + 1 month is the last day of February).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn shift_months(at: NaiveDateTime, months: i32) -> NaiveDateTime {
    add_months(at.date(), months).and_time(at.time())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// Weekday column of `date` in a Sunday-first grid (0 = Sunday).
pub fn sunday_offset(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Last representable millisecond of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDateTime {
    let next = add_months(first_of_month(date), 1);
    next.and_time(NaiveTime::MIN) - TimeDelta::milliseconds(1)
}

pub fn month_heading(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub fn day_heading(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

pub fn slot_heading(at: NaiveDateTime) -> String {
    at.format("%d %B %Y %I:%M %p").to_string()
}

/// Twelve-hour label for a slot, e.g. `02:30 PM`.
pub fn slot_label(hour: u32, minute: u32) -> String {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time.format("%I:%M %p").to_string(),
        None => format!("{hour:02}:{minute:02}"),
    }
}

/// ISO-8601 in UTC with millisecond precision, the shape the booking
/// backend expects for `timeMin`/`timeMax`.
pub fn to_iso_utc(instant: DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
