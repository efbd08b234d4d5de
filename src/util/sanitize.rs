//! Boundary between loosely typed rule fields and `RecurrenceRule`
//!
//! Nothing here fails: a value that cannot be used is replaced by a
//! documented fallback, and the caller is told so through `Sanitized`.

use crate::util::date::Time;

/// A value obtained from raw input, remembering whether it had to be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitized<T> {
    /// input was used as is
    Valid(T),
    /// input was unusable, this is the fallback
    Fallback(T),
}

impl<T> Sanitized<T> {
    pub fn value(self) -> T {
        match self {
            Sanitized::Valid(v) | Sanitized::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Sanitized::Fallback(_))
    }
}

pub const DEFAULT_DAY_OF_MONTH: u8 = 1;
pub const DEFAULT_LEAD_TIME_DAYS: u8 = 0;
pub const MAX_LEAD_TIME_DAYS: u8 = 7;

fn integer_in(raw: &str, lo: i64, hi: i64) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| (lo..=hi).contains(n))
}

/// Day of month in `1..=31`, falls back to 1
///
/// Values that are valid but exceed the length of some month are kept:
/// they are truncated later, against the month being resolved.
pub fn clamp_day_of_month(raw: &str) -> Sanitized<u8> {
    match integer_in(raw, 1, 31) {
        Some(day) => Sanitized::Valid(day as u8),
        None => Sanitized::Fallback(DEFAULT_DAY_OF_MONTH),
    }
}

/// Lead time in `0..=7` days, falls back to 0
pub fn clamp_lead_time_days(raw: &str) -> Sanitized<u8> {
    match integer_in(raw, 0, i64::from(MAX_LEAD_TIME_DAYS)) {
        Some(lead) => Sanitized::Valid(lead as u8),
        None => Sanitized::Fallback(DEFAULT_LEAD_TIME_DAYS),
    }
}

/// `H:MM` or `HH:MM`, falls back to `09:00`
pub fn normalize_time_of_day(raw: &str) -> Sanitized<Time> {
    match parse_hh_mm(raw.trim()) {
        Some(time) => Sanitized::Valid(time),
        None => Sanitized::Fallback(Time::DEFAULT_REMINDER),
    }
}

fn parse_hh_mm(s: &str) -> Option<Time> {
    let (hour, minute) = s.split_once(':')?;
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
        return None;
    }
    if !all_digits(hour) || !all_digits(minute) {
        return None;
    }
    Time::from(hour.parse().ok()?, minute.parse().ok()?)
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! valid {
        ( $f:ident $raw:expr => $v:expr ) => {
            assert_eq!($f($raw), Sanitized::Valid($v));
        }
    }
    macro_rules! fallback {
        ( $f:ident $raw:expr => $v:expr ) => {
            assert_eq!($f($raw), Sanitized::Fallback($v));
        }
    }

    #[test]
    fn day_of_month() {
        valid!(clamp_day_of_month "1" => 1);
        valid!(clamp_day_of_month "31" => 31);
        valid!(clamp_day_of_month " 15 " => 15);
        fallback!(clamp_day_of_month "0" => 1);
        fallback!(clamp_day_of_month "32" => 1);
        fallback!(clamp_day_of_month "-3" => 1);
        fallback!(clamp_day_of_month "3.5" => 1);
        fallback!(clamp_day_of_month "NaN" => 1);
        fallback!(clamp_day_of_month "" => 1);
    }

    #[test]
    fn lead_time() {
        valid!(clamp_lead_time_days "0" => 0);
        valid!(clamp_lead_time_days "7" => 7);
        fallback!(clamp_lead_time_days "8" => 0);
        fallback!(clamp_lead_time_days "-1" => 0);
        fallback!(clamp_lead_time_days "Infinity" => 0);
    }

    #[test]
    fn time_of_day() {
        let t = |h, m| Time::from(h, m).unwrap();
        valid!(normalize_time_of_day "09:00" => t(9, 0));
        valid!(normalize_time_of_day "9:05" => t(9, 5));
        valid!(normalize_time_of_day "23:59" => t(23, 59));
        valid!(normalize_time_of_day "00:00" => t(0, 0));
        fallback!(normalize_time_of_day "garbage" => t(9, 0));
        fallback!(normalize_time_of_day "24:00" => t(9, 0));
        fallback!(normalize_time_of_day "12:60" => t(9, 0));
        fallback!(normalize_time_of_day "12:5" => t(9, 0));
        fallback!(normalize_time_of_day "+1:30" => t(9, 0));
        fallback!(normalize_time_of_day "123:00" => t(9, 0));
        fallback!(normalize_time_of_day "" => t(9, 0));
    }

    #[test]
    fn sanitized_accessors() {
        assert_eq!(Sanitized::Valid(3).value(), 3);
        assert!(Sanitized::Fallback(1).is_fallback());
        assert!(!Sanitized::Valid(1).is_fallback());
    }
}
