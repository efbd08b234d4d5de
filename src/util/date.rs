//! Day-precise calendar and minute-precise wall clock
//!
//! Dates are `YYYY-Mmm-DD`, not number of seconds, and provide an interface
//! for jumping by a number of days or months while respecting month lengths.
//!
//! Instants pair a date with a time of day in a single implicit local zone:
//! there is no timezone conversion anywhere in this module.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

/// A date with day-precision
///
/// Every constructed `Date` is a real calendar day: the day is always
/// within the length of its month for its year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: Month,
    day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:02}", self.year, self.month, self.day)
    }
}

/// Twelve months in the year, identified by their 3-letter abbreviations
///
/// Discriminants are 0-based (`Jan = 0`, ..., `Dec = 11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan = 0,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    const ALL: [Month; 12] = {
        use Month::*;
        [Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec]
    };

    /// Month from its 0-based index, `None` outside of `0..=11`
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::from_usize(idx)
    }

    /// Month from any index, wrapping around the year in both directions
    fn wrapping(idx: i64) -> Self {
        Self::ALL[idx.rem_euclid(12) as usize]
    }

    /// Month directly succeeding the current one with wrapping
    pub fn next(self) -> Self {
        Self::wrapping(self as i64 + 1)
    }

    /// Month directly preceding the current one with wrapping
    pub fn prev(self) -> Self {
        Self::wrapping(self as i64 - 1)
    }

    /// Number of days in this month of the given year
    pub fn count(self, year: i32) -> u8 {
        use Month::*;
        match self {
            Jan | Mar | May | Jul | Aug | Oct | Dec => 31,
            Apr | Jun | Sep | Nov => 30,
            Feb => if is_leap(year) { 29 } else { 28 },
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Ways in which a date taken from user input can be wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// Feb 29 of a non-leap year
    NotBissextile(i32),
    /// Feb 30 or Feb 31 or 31st day of a 30-day month, with the month length
    MonthTooShort(Month, usize, u8),
    /// day outside of 1..=31
    InvalidDay(usize),
}

impl Date {
    /// Validate year-month-day into date
    pub fn from(year: i32, month: Month, day: usize) -> Result<Self, DateError> {
        if day == 0 || day > 31 {
            Err(DateError::InvalidDay(day))
        } else if day <= month.count(year) as usize {
            Ok(Self { year, month, day: day as u8 })
        } else if day >= 30 {
            Err(DateError::MonthTooShort(month, day, month.count(year)))
        } else {
            Err(DateError::NotBissextile(year))
        }
    }

    /// Build a date that always exists
    ///
    /// `day` is first brought into `1..=31`, then truncated to fit in the month:
    /// day 31 of `2023-Feb` makes it `2023-Feb-28`.
    pub fn clamped(year: i32, month: Month, day: u8) -> Self {
        let day = day.clamp(1, 31).min(month.count(year));
        Self { year, month, day }
    }

    /// `self.day` accessor
    pub fn day(&self) -> u8 {
        self.day
    }

    /// `self.month` accessor
    pub fn month(&self) -> Month {
        self.month
    }

    /// `self.year` accessor
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Following day, `i32::MAX-Dec-31` is its own successor
    pub fn next(self) -> Self {
        if self.month.count(self.year) == self.day {
            if self.month == Month::Dec {
                match self.year.checked_add(1) {
                    Some(year) => Self { year, month: Month::Jan, day: 1 },
                    None => self,
                }
            } else {
                Self { month: self.month.next(), day: 1, ..self }
            }
        } else {
            Self { day: self.day + 1, ..self }
        }
    }

    /// Preceding day, `i32::MIN-Jan-01` is its own predecessor
    pub fn prev(self) -> Self {
        if self.day == 1 {
            if self.month == Month::Jan {
                match self.year.checked_sub(1) {
                    Some(year) => Self { year, month: Month::Dec, day: 31 },
                    None => self,
                }
            } else {
                let month = self.month.prev();
                Self { month, day: month.count(self.year), ..self }
            }
        } else {
            Self { day: self.day - 1, ..self }
        }
    }

    /// `count` days before/after current date
    ///
    /// Whole stretches of a month are skipped at once, so the cost is
    /// proportional to the number of months crossed. Stops at the first and
    /// last day representable.
    pub fn jump_day(self, count: i64) -> Self {
        let mut d = self;
        if count > 0 {
            let mut count = count;
            while count > 0 {
                let diff = i64::from(d.month.count(d.year) - d.day).min(count);
                d.day += diff as u8;
                count -= diff;
                if count > 0 {
                    let n = d.next();
                    if n == d {
                        break;
                    }
                    d = n;
                    count -= 1;
                }
            }
        } else {
            let mut count = -count;
            while count > 0 {
                let diff = i64::from(d.day - 1).min(count);
                d.day -= diff as u8;
                count -= diff;
                if count > 0 {
                    let p = d.prev();
                    if p == d {
                        break;
                    }
                    d = p;
                    count -= 1;
                }
            }
        }
        d
    }
}

/// Year and month reached after moving `count` months from `(year, month)`
///
/// Stops at `i32::MIN-Jan` and `i32::MAX-Dec` instead of wrapping around.
pub fn month_offset(year: i32, month: Month, count: i64) -> (i32, Month) {
    let total = (i64::from(year) * 12 + month as i64).saturating_add(count);
    match i32::try_from(total.div_euclid(12)) {
        Ok(year) => (year, Month::wrapping(total)),
        Err(_) if total < 0 => (i32::MIN, Month::Jan),
        Err(_) => (i32::MAX, Month::Dec),
    }
}

fn is_leap(year: i32) -> bool {
    if year.rem_euclid(400) == 0 {
        true
    } else if year.rem_euclid(100) == 0 {
        false
    } else {
        year.rem_euclid(4) == 0
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DateError::*;
        match self {
            NotBissextile(y) => write!(f, "{} is not bissextile, Feb 29 does not exist", y),
            MonthTooShort(m, d, _) => write!(
                f,
                "{} is a short month, it does not have a {}th day",
                m, d,
            ),
            InvalidDay(d) => write!(f, "{} is not a valid day", d),
        }
    }
}

impl DateError {
    /// What message to show to help fix the date error
    pub fn fix_hint(&self) -> String {
        use DateError::*;
        match self {
            NotBissextile(y) => format!("did you mean {y}-Feb-28 or {y}-Mar-01 ?", y = y),
            MonthTooShort(m, _, len) => format!("{} is only {} days long", m, len),
            InvalidDay(d) => format!("{} is not in the range 1 ..= 31", d),
        }
    }
}

/// Wall-clock time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    hour: u8,
    minute: u8,
}

impl Time {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };
    /// Time of day used when a reminder time is missing or malformed
    pub const DEFAULT_REMINDER: Self = Self { hour: 9, minute: 0 };

    /// `None` unless `hour` is in `0..=23` and `minute` in `0..=59`
    pub fn from(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// `self.hour` accessor
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// `self.minute` accessor
    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A point in time: a date and a time of day in the local zone
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    date: Date,
    time: Time,
}

impl Instant {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    /// Midnight at the start of `date`
    pub fn start_of_day(date: Date) -> Self {
        Self::new(date, Time::MIDNIGHT)
    }

    /// `self.date` accessor
    pub fn date(&self) -> Date {
        self.date
    }

    /// `self.time` accessor
    pub fn time(&self) -> Time {
        self.time
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// Seconds and below are dropped.
///
/// Reminder instants always fall on a whole minute, so for any such `due`,
/// `due <= now` holds exactly when it holds for the truncated `now`.
impl From<chrono::NaiveDateTime> for Instant {
    fn from(dt: chrono::NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};
        let date = Date {
            year: dt.year(),
            month: Month::wrapping(i64::from(dt.month0())),
            day: dt.day() as u8,
        };
        let time = Time {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
        };
        Self { date, time }
    }
}
