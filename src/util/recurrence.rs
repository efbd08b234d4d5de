//! Monthly recurrence: from a rule and the current instant to the next reminder
//!
//! All functions are pure and take `now` as a parameter, the clock is
//! never read from here.
//!
//! A rule fires on a day of the month. That day is truncated to the length
//! of each month it is resolved in (`31` is `Apr-30`, `Feb-28` or `Feb-29`),
//! and the reminder itself is set `lead_time_days` before, at a fixed time of day.

use std::fmt;

use crate::util::{
    date::{self, Date, Instant, Month, Time},
    sanitize,
};

/// A monthly recurring item, with already sanitized fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// stable and never reused
    pub id: String,
    /// `1..=31`
    pub day_of_month: u8,
    /// `0..=7`
    pub lead_time_days: u8,
    pub time_of_day: Time,
    pub active: bool,
    pub notify: bool,
}

/// A resolved reminder: the occurrence and the instant its reminder fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub occurrence: Date,
    pub at: Instant,
}

impl fmt::Display for Due {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (for {})", self.at, self.occurrence)
    }
}

impl RecurrenceRule {
    /// Rules are only resolved when both active and notifying
    pub fn is_live(&self) -> bool {
        self.active && self.notify
    }

    /// Next reminder of a live rule
    pub fn resolve(&self, now: Instant) -> Option<Due> {
        if self.is_live() {
            Some(due_instant(self, now))
        } else {
            None
        }
    }
}

/// Occurrence of the rule in a given month
///
/// `day_of_month` is brought into `1..=31` then truncated to the month length.
pub fn occurrence_in(year: i32, month: Month, day_of_month: u8) -> Date {
    Date::clamped(year, month, day_of_month)
}

/// First occurrence that is not before the calendar day of `now`
///
/// An occurrence on the same day as `now` has not passed yet,
/// regardless of the time of day.
pub fn next_occurrence(day_of_month: u8, now: Instant) -> Date {
    let today = now.date();
    let this_month = occurrence_in(today.year(), today.month(), day_of_month);
    if this_month >= today {
        this_month
    } else {
        let (year, month) = date::month_offset(today.year(), today.month(), 1);
        occurrence_in(year, month, day_of_month)
    }
}

fn reminder_for(rule: &RecurrenceRule, occurrence: Date) -> Due {
    let day = occurrence.jump_day(-i64::from(rule.lead_time_days));
    Due {
        occurrence,
        at: Instant::new(day, rule.time_of_day),
    }
}

/// Next reminder strictly after `now`
///
/// Starts from `next_occurrence`; whenever the lead time puts the reminder
/// at or before `now`, the occurrence of the following month is used
/// instead, truncating the rule's own day again for that month.
/// In the last month of `i32::MAX` there is no following month, and the
/// reminder of that month is returned even if it has passed.
pub fn due_instant(rule: &RecurrenceRule, now: Instant) -> Due {
    let first = next_occurrence(rule.day_of_month, now);
    let mut due = reminder_for(rule, first);
    let mut offset = 0;
    while due.at <= now {
        offset += 1;
        let (year, month) = date::month_offset(first.year(), first.month(), offset);
        let occurrence = occurrence_in(year, month, rule.day_of_month);
        if occurrence == due.occurrence {
            break;
        }
        due = reminder_for(rule, occurrence);
    }
    due
}

/// Successive monthly reminders of a rule, see `upcoming`
#[derive(Debug, Clone)]
pub struct Upcoming<'r> {
    rule: &'r RecurrenceRule,
    next: Due,
}

impl Iterator for Upcoming<'_> {
    type Item = Due;

    fn next(&mut self) -> Option<Due> {
        let current = self.next;
        let occ = current.occurrence;
        let (year, month) = date::month_offset(occ.year(), occ.month(), 1);
        self.next = reminder_for(self.rule, occurrence_in(year, month, self.rule.day_of_month));
        Some(current)
    }
}

/// Endless forecast of reminders, one per month, starting at `due_instant`
pub fn upcoming(rule: &RecurrenceRule, now: Instant) -> Upcoming<'_> {
    Upcoming {
        rule,
        next: due_instant(rule, now),
    }
}

/// Assembles a `RecurrenceRule` from raw field values
///
/// Every raw value goes through `util::sanitize`, missing fields take the
/// same defaults as unusable ones.
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    rule: RecurrenceRule,
}

impl RuleBuilder {
    pub fn new<S>(id: S) -> Self
    where
        S: ToString,
    {
        Self {
            rule: RecurrenceRule {
                id: id.to_string(),
                day_of_month: sanitize::DEFAULT_DAY_OF_MONTH,
                lead_time_days: sanitize::DEFAULT_LEAD_TIME_DAYS,
                time_of_day: Time::DEFAULT_REMINDER,
                active: true,
                notify: true,
            },
        }
    }

    pub fn day(mut self, raw: &str) -> Self {
        self.rule.day_of_month = sanitize::clamp_day_of_month(raw).value();
        self
    }

    pub fn lead(mut self, raw: &str) -> Self {
        self.rule.lead_time_days = sanitize::clamp_lead_time_days(raw).value();
        self
    }

    pub fn at(mut self, raw: &str) -> Self {
        self.rule.time_of_day = sanitize::normalize_time_of_day(raw).value();
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.rule.active = active;
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.rule.notify = notify;
        self
    }

    pub fn build(self) -> RecurrenceRule {
        self.rule
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::date::Month::*;
    use crate::{at, dt};

    fn rule(day: &str, lead: &str, time: &str) -> RecurrenceRule {
        RuleBuilder::new("rec_1").day(day).lead(lead).at(time).build()
    }

    macro_rules! occ {
        ( $y:tt $m:ident $day:expr => $date:expr ) => {
            assert_eq!(occurrence_in($y, $m, $day), $date);
        }
    }

    #[test]
    fn month_length_truncation() {
        occ!(2024 Feb 31 => dt!(2024-Feb-29));
        occ!(2023 Feb 31 => dt!(2023-Feb-28));
        occ!(2023 Apr 31 => dt!(2023-Apr-30));
        occ!(2023 Jan 31 => dt!(2023-Jan-31));
        occ!(2023 Jan 0 => dt!(2023-Jan-1));
        occ!(2023 Jan 99 => dt!(2023-Jan-31));
        let feb = Month::from_index(1).unwrap();
        occ!(2024 feb 30 => dt!(2024-Feb-29));
    }

    macro_rules! next {
        ( $day:expr, $now:expr => $date:expr ) => {
            assert_eq!(next_occurrence($day, $now), $date);
        }
    }

    #[test]
    fn same_day_is_not_passed() {
        next!(15, at!(2024-Mar-15 00:00) => dt!(2024-Mar-15));
        next!(15, at!(2024-Mar-15 23:59) => dt!(2024-Mar-15));
    }

    #[test]
    fn past_this_month_rolls_over() {
        next!(3, at!(2024-Mar-10 12:00) => dt!(2024-Apr-3));
        next!(3, at!(2024-Dec-10 12:00) => dt!(2025-Jan-3));
        next!(31, at!(2024-Jan-31 08:00) => dt!(2024-Jan-31));
        next!(30, at!(2024-Jan-31 08:00) => dt!(2024-Feb-29));
        next!(20, at!(2024-Mar-19 08:00) => dt!(2024-Mar-20));
    }

    macro_rules! due {
        ( $rule:expr, $now:expr => $occ:expr, $at:expr ) => {{
            let due = due_instant(&$rule, $now);
            assert_eq!(due.occurrence, $occ);
            assert_eq!(due.at, $at);
            assert!(due.at > $now);
        }}
    }

    #[test]
    fn lead_time_and_time_of_day() {
        due!(rule("20", "0", "09:00"), at!(2024-Mar-10 12:00)
            => dt!(2024-Mar-20), at!(2024-Mar-20 09:00));
        due!(rule("20", "3", "18:30"), at!(2024-Mar-10 12:00)
            => dt!(2024-Mar-20), at!(2024-Mar-17 18:30));
        due!(rule("2", "3", "08:00"), at!(2024-Feb-20 12:00)
            => dt!(2024-Mar-2), at!(2024-Feb-28 08:00));
        due!(rule("1", "7", "08:00"), at!(2024-Dec-20 12:00)
            => dt!(2025-Jan-1), at!(2024-Dec-25 08:00));
    }

    #[test]
    fn end_of_month_rollover() {
        due!(rule("31", "2", "09:00"), at!(2024-Mar-30 10:00)
            => dt!(2024-Apr-30), at!(2024-Apr-28 09:00));
    }

    #[test]
    fn same_day_but_time_passed() {
        due!(rule("15", "0", "09:00"), at!(2024-Mar-15 09:00)
            => dt!(2024-Apr-15), at!(2024-Apr-15 09:00));
        due!(rule("15", "0", "09:00"), at!(2024-Mar-15 08:59)
            => dt!(2024-Mar-15), at!(2024-Mar-15 09:00));
    }

    #[test]
    fn garbage_time_defaults_to_nine() {
        due!(rule("20", "0", "garbage"), at!(2024-Mar-10 12:00)
            => dt!(2024-Mar-20), at!(2024-Mar-20 09:00));
    }

    #[test]
    fn never_in_the_past() {
        let mut now = at!(2023-Dec-25 13:37);
        let end = dt!(2025-Mar-1);
        while now.date() < end {
            for day in [1, 15, 28, 29, 30, 31] {
                for lead in 0..=7 {
                    let r = rule(&day.to_string(), &lead.to_string(), "13:37");
                    let due = due_instant(&r, now);
                    assert!(due.at > now, "{} -> {}", now, due);
                    assert!(due.occurrence >= now.date());
                    let occ = due.occurrence;
                    assert_eq!(occ.day(), day.min(occ.month().count(occ.year())));
                }
            }
            now = Instant::new(now.date().next(), now.time());
        }
    }

    #[test]
    fn last_month_of_the_calendar() {
        let r = rule("31", "2", "09:00");
        let due = due_instant(&r, at!(2147483647-Dec-1 12:00));
        assert_eq!(due.occurrence, dt!(2147483647-Dec-31));
        assert_eq!(due.at, at!(2147483647-Dec-29 09:00));
        let stuck = due_instant(&r, at!(2147483647-Dec-31 23:59));
        assert_eq!(stuck.occurrence, dt!(2147483647-Dec-31));
    }

    #[test]
    fn inactive_rules_do_not_resolve() {
        let now = at!(2024-Mar-10 12:00);
        let r = RuleBuilder::new("x").day("20").active(false).build();
        assert_eq!(r.resolve(now), None);
        let r = RuleBuilder::new("x").day("20").notify(false).build();
        assert_eq!(r.resolve(now), None);
        let r = RuleBuilder::new("x").day("20").build();
        assert_eq!(r.resolve(now), Some(due_instant(&r, now)));
    }

    #[test]
    fn forecast() {
        let r = rule("31", "2", "09:00");
        let dues = upcoming(&r, at!(2024-Mar-30 10:00))
            .take(4)
            .map(|due| due.at)
            .collect::<Vec<_>>();
        assert_eq!(dues, vec![
            at!(2024-Apr-28 09:00),
            at!(2024-May-29 09:00),
            at!(2024-Jun-28 09:00),
            at!(2024-Jul-29 09:00),
        ]);
    }

    #[test]
    fn builder_defaults() {
        let r = RuleBuilder::new("rec_1").build();
        assert_eq!(r.day_of_month, 1);
        assert_eq!(r.lead_time_days, 0);
        assert_eq!(r.time_of_day, Time::DEFAULT_REMINDER);
        assert!(r.is_live());
        let r = rule("45", "12", "25:00");
        assert_eq!((r.day_of_month, r.lead_time_days), (1, 0));
        assert_eq!(r.time_of_day, Time::DEFAULT_REMINDER);
    }
}
