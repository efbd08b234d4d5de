//! Presentation of the planned reminders

pub mod table;

use crate::load::error::Record;
use crate::schedule::Schedule;
use crate::util::{
    bill::Bill,
    date::{Date, Instant, Month, Time},
    recurrence, slot,
};

use table::Line;

/// Lines of the reminder table, in the order they fire
///
/// Each bill that holds its slot in the schedule gets its next `count`
/// reminders, so a `count` of 0 leaves only the bills without a reminder.
/// Those (paused, muted, or that lost their slot to another bill) are listed
/// last, only if `all` is set.
pub fn agenda(bills: &[Bill], now: Instant, count: usize, all: bool) -> Vec<Line> {
    let schedule = Schedule::plan(bills.iter().map(|bill| &bill.rule), now);
    let mut lines = Vec::new();
    for bill in bills {
        let line = |due| Line {
            slot: slot::derive_slot_id(&bill.rule.id),
            name: bill.name().to_string(),
            amount: bill.amount,
            due,
        };
        if schedule.find(&bill.rule.id).is_some() {
            for due in recurrence::upcoming(&bill.rule, now).take(count) {
                lines.push(line(Some(due)));
            }
        } else if all {
            lines.push(line(None));
        }
    }
    lines.sort_by_key(|line| (line.due.is_none(), line.due.map(|due| due.at), line.slot));
    lines
}

/// Reference instant written `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` for midnight
///
/// Impossible dates such as `2023-02-29` are reported with a fix.
pub fn read_now(raw: &str, errs: &mut Record) -> Option<Instant> {
    let mut words = raw.split_whitespace();
    let (day, time) = match (words.next(), words.next(), words.next()) {
        (Some(day), time, None) => (day, time),
        _ => {
            report_instant(raw, errs);
            return None;
        }
    };
    let mut fields = day.splitn(3, '-');
    let year = fields.next().and_then(|y| y.parse::<i32>().ok());
    let month = fields
        .next()
        .and_then(|m| m.parse::<usize>().ok())
        .and_then(|m| m.checked_sub(1))
        .and_then(Month::from_index);
    let dom = fields.next().and_then(|d| d.parse::<usize>().ok());
    let date = match (year, month, dom) {
        (Some(year), Some(month), Some(dom)) => match Date::from(year, month, dom) {
            Ok(date) => date,
            Err(e) => {
                errs.make("Invalid date")
                    .text(format!("'{}' given to --now: {}", raw, e))
                    .hint(e.fix_hint());
                return None;
            }
        },
        _ => {
            report_instant(raw, errs);
            return None;
        }
    };
    match time {
        None => Some(Instant::start_of_day(date)),
        Some(time) => {
            use chrono::Timelike;
            let clock = chrono::NaiveTime::parse_from_str(time, "%H:%M")
                .ok()
                .and_then(|t| Time::from(t.hour() as u8, t.minute() as u8));
            match clock {
                Some(clock) => Some(Instant::new(date, clock)),
                None => {
                    report_instant(raw, errs);
                    None
                }
            }
        }
    }
}

fn report_instant(raw: &str, errs: &mut Record) {
    errs.make("Invalid instant")
        .text(format!("'{}' given to --now", raw))
        .hint("write it as 'YYYY-MM-DD HH:MM' or 'YYYY-MM-DD'");
}

/// Number of reminders to forecast per bill, at least 1
pub fn read_count(raw: &str, errs: &mut Record) -> Option<usize> {
    match raw.parse::<usize>() {
        Ok(count) if count > 0 => Some(count),
        _ => {
            errs.make("Invalid count")
                .text(format!("'{}' given to --count", raw))
                .hint("use a positive number of reminders");
            None
        }
    }
}
