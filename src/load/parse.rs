//! Convert the contents of a rule file into a list of bills
//!
//! Field values that cannot be used are replaced by their fallback and
//! reported as warnings: a malformed reminder time should not prevent the
//! rest of the file from being scheduled.

#![allow(clippy::upper_case_acronyms)]

use pest::Parser;
use pest_derive::*;
use std::collections::HashMap;
use std::fmt;

/// Wrapper around Pest's `Pair`
type Pair<'i> = pest::iterators::Pair<'i, Rule>;
/// Wrapper around Pest's `Pairs`
type Pairs<'i> = pest::iterators::Pairs<'i, Rule>;

use crate::load::error;
use crate::util::{
    bill::{Amount, Bill},
    recurrence::RecurrenceRule,
    sanitize::{self, Sanitized},
};

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/rules.pest"]
pub struct RulesParser;

/// A field that may be given at most once, with a default otherwise
struct Once<'i, T> {
    name: &'i str,
    loc: &'i error::Loc<'i>,
    valid: bool,
    data: Option<T>,
}

impl<'i, T> Once<'i, T> {
    fn new(name: &'i str, loc: &'i error::Loc) -> Self {
        Self {
            name,
            loc,
            valid: true,
            data: None,
        }
    }

    fn try_set(&mut self, val: T, errs: &mut error::Record) {
        if self.data.is_some() {
            errs.make("Duplicate field definition")
                .span(self.loc, format!("attempt to override {}", self.name))
                .text("Each field may only be defined once")
                .hint("remove one of the field definitions");
            self.valid = false;
        }
        self.data = Some(val);
    }

    fn get_or(self, default: T) -> Option<T> {
        if self.valid {
            Some(self.data.unwrap_or(default))
        } else {
            None
        }
    }
}

/// Get the bills described by `contents`, read from file `path`
///
/// The return value may be non-empty even if some errors (including fatal ones) occured.
/// More specifically, return value contains all rules that were read correctly.
///
/// Caller should determine the success of this function not through its return value
/// but by querying `errs` (e.g. by checking `errs.is_fatal()` or `errs.count_errors()`)
pub fn extract(path: &str, errs: &mut error::Record, contents: &str) -> Vec<Bill> {
    match RulesParser::parse(Rule::program, contents) {
        Ok(contents) => validate(path, errs, contents),
        Err(e) => {
            errs.make("Parsing failure").from(e.with_path(path));
            Vec::new()
        }
    }
}

// extract contents of wrapper rule
macro_rules! subrule {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No subrule"));
        if items.next().is_some() {
            panic!("Several subrules");
        }
        fst
    }};
}

// get first and rest of inner
macro_rules! decapitate {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No head"));
        (fst, items)
    }};
}

/// Check all rules
///
/// Sequentially validates each rule, records errors, accumulates the
/// correct ones into the return value. Ids must be unique across the file.
fn validate<'i>(path: &'i str, errs: &mut error::Record, pairs: Pairs<'i>) -> Vec<Bill> {
    let mut bills = Vec::new();
    let mut seen: HashMap<&'i str, pest::Span<'i>> = HashMap::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::rule_block => {
                let span = pair.as_span();
                let (id, bill) = match validate_block(path, errs, pair) {
                    Some(x) => x,
                    None => continue,
                };
                if let Some(first) = seen.get(id) {
                    errs.make("Duplicate rule")
                        .span(&(path, span), format!("'{}' is defined again here", id))
                        .span(&(path, *first), "first defined here")
                        .text("Rule ids must be unique, each one owns a reminder slot")
                        .hint("rename one of the rules");
                    continue;
                }
                seen.insert(id, span);
                bills.push(bill);
            }
            Rule::EOI => break,
            _ => unreachable!("{:?}", pair),
        }
    }
    bills
}

/// Check that a rule block is valid
///
/// This can raise errors since the grammar can't ensure that no
/// field is defined twice
fn validate_block<'i>(
    path: &'i str,
    errs: &mut error::Record,
    pair: Pair<'i>,
) -> Option<(&'i str, Bill)> {
    let loc = (path, pair.as_span());
    let (id, body) = decapitate!(pair);
    assert_eq!(id.as_rule(), Rule::identifier);
    let mut day = Once::new("day", &loc);
    let mut lead = Once::new("lead", &loc);
    let mut time = Once::new("at", &loc);
    let mut label = Once::new("label", &loc);
    let mut amount = Once::new("amount", &loc);
    let mut paused = Once::new("paused", &loc);
    let mut muted = Once::new("muted", &loc);
    for item in body {
        let item_loc = (path, item.as_span());
        match item.as_rule() {
            Rule::field_day => {
                let raw = read_value(subrule!(item));
                let value = report_fallback(
                    errs,
                    &item_loc,
                    sanitize::clamp_day_of_month(raw),
                    format!("'{}' is not a valid day of the month", raw),
                    "days of the month are 1 ..= 31, shorter months use their last day",
                );
                day.try_set(value, errs);
            }
            Rule::field_lead => {
                let raw = read_value(subrule!(item));
                let value = report_fallback(
                    errs,
                    &item_loc,
                    sanitize::clamp_lead_time_days(raw),
                    format!("'{}' is not a valid lead time", raw),
                    "reminders can be set 0 ..= 7 days before the due date",
                );
                lead.try_set(value, errs);
            }
            Rule::field_time => {
                let raw = read_value(subrule!(item));
                let value = report_fallback(
                    errs,
                    &item_loc,
                    sanitize::normalize_time_of_day(raw),
                    format!("'{}' is not a valid time of day", raw),
                    "times of day are written HH:MM, from 00:00 to 23:59",
                );
                time.try_set(value, errs);
            }
            Rule::field_label => {
                label.try_set(Some(read_value(subrule!(item)).to_string()), errs);
            }
            Rule::field_amount => {
                let amount_pair = subrule!(item);
                let value = match read_amount(amount_pair.as_str()) {
                    Some(value) => value,
                    None => {
                        errs.make("Invalid amount")
                            .span(&item_loc, "provided here")
                            .text(format!("'{}' is out of range", amount_pair.as_str()))
                            .hint("write amounts as 'XXX.XX'");
                        return None;
                    }
                };
                amount.try_set(Some(value), errs);
            }
            Rule::flag_paused => paused.try_set(true, errs),
            Rule::flag_muted => muted.try_set(true, errs),
            _ => unreachable!("{:?}", item),
        }
    }
    let rule = RecurrenceRule {
        id: id.as_str().to_string(),
        day_of_month: day.get_or(sanitize::DEFAULT_DAY_OF_MONTH)?,
        lead_time_days: lead.get_or(sanitize::DEFAULT_LEAD_TIME_DAYS)?,
        time_of_day: time.get_or(crate::util::date::Time::DEFAULT_REMINDER)?,
        active: !paused.get_or(false)?,
        notify: !muted.get_or(false)?,
    };
    let bill = Bill {
        rule,
        label: label.get_or(None)?,
        amount: amount.get_or(None)?,
    };
    Some((id.as_str(), bill))
}

/// Either the contents of a quoted string or a raw token
///
/// Grammar ensures this cannot fail
fn read_value(pair: Pair) -> &str {
    match pair.as_rule() {
        Rule::quoted => subrule!(pair).as_str(),
        Rule::raw => pair.as_str(),
        _ => unreachable!("{:?}", pair),
    }
}

/// Parse an amount of money `[-]X[.Y[Y]]` into cents
///
/// Grammar ensures the shape, this only fails on overflow
fn read_amount(s: &str) -> Option<Amount> {
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (units, cents) = s.split_once('.').unwrap_or((s, "0"));
    let units = units.parse::<i64>().ok()?;
    let cents = match cents.len() {
        1 => cents.parse::<i64>().ok()? * 10,
        _ => cents.parse::<i64>().ok()?,
    };
    let total = units.checked_mul(100)?.checked_add(cents)?;
    Some(Amount(if negative { -total } else { total }))
}

/// Use the sanitized value, and warn when it is a fallback
fn report_fallback<T, S>(
    errs: &mut error::Record,
    loc: &error::Loc,
    value: Sanitized<T>,
    msg: S,
    hint: &str,
) -> T
where
    T: fmt::Display + Copy,
    S: ToString,
{
    if value.is_fallback() {
        errs.make("Unusable field value")
            .nonfatal()
            .span(loc, msg)
            .text(format!("Using {} instead", value.value()))
            .hint(hint);
    }
    value.value()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::date::Time;

    fn load(contents: &str) -> (Vec<Bill>, error::Record) {
        let mut errs = error::Record::new();
        let bills = extract("test.ech", &mut errs, contents);
        (bills, errs)
    }

    macro_rules! labels {
        ( $errs:expr ) => {
            $errs.iter().map(|e| (e.label().to_string(), e.is_fatal())).collect::<Vec<_>>()
        }
    }

    #[test]
    fn full_rule() {
        let (bills, errs) = load(r#"
            # monthly
            rent {
                label "Flat rent";
                amount 850.5;
                day 31;
                lead 2;
                at 09:00;
            }
        "#);
        assert!(errs.is_empty(), "{}", errs);
        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_eq!(bill.rule.id, "rent");
        assert_eq!(bill.rule.day_of_month, 31);
        assert_eq!(bill.rule.lead_time_days, 2);
        assert_eq!(bill.rule.time_of_day, Time::DEFAULT_REMINDER);
        assert!(bill.rule.is_live());
        assert_eq!(bill.label.as_deref(), Some("Flat rent"));
        assert_eq!(bill.amount, Some(Amount(85050)));
    }

    #[test]
    fn defaults_and_flags() {
        let (bills, errs) = load("gym { muted; } phone { day 15; at \"18:30\"; paused; } water {}");
        assert!(errs.is_empty(), "{}", errs);
        let ids = bills.iter().map(|b| b.rule.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["gym", "phone", "water"]);
        assert!(bills[0].rule.active && !bills[0].rule.notify);
        assert!(!bills[1].rule.active && bills[1].rule.notify);
        assert_eq!(bills[1].rule.time_of_day, Time::from(18, 30).unwrap());
        assert_eq!(bills[2].rule.day_of_month, 1);
        assert_eq!(bills[2].rule.lead_time_days, 0);
        assert_eq!(bills[2].label, None);
        assert_eq!(bills[2].amount, None);
    }

    #[test]
    fn fallbacks_are_warnings() {
        let (bills, errs) = load("rec_1 { day 45; lead -2; at garbage; }");
        assert!(!errs.is_fatal());
        assert_eq!(errs.count_warnings(), 3);
        assert_eq!(bills.len(), 1);
        let rule = &bills[0].rule;
        assert_eq!(rule.day_of_month, 1);
        assert_eq!(rule.lead_time_days, 0);
        assert_eq!(rule.time_of_day, Time::DEFAULT_REMINDER);
        assert!(format!("{}", errs).contains("'garbage' is not a valid time of day"));
    }

    #[test]
    fn duplicate_field_is_fatal() {
        let (bills, errs) = load("rent { day 1; day 2; } gym { day 3; }");
        assert_eq!(labels!(errs), vec![("Duplicate field definition".to_string(), true)]);
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].rule.id, "gym");
    }

    #[test]
    fn duplicate_rule_is_fatal() {
        let (bills, errs) = load("rent { day 1; }\nrent { day 2; }");
        assert_eq!(labels!(errs), vec![("Duplicate rule".to_string(), true)]);
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].rule.day_of_month, 1);
    }

    #[test]
    fn syntax_error_is_fatal() {
        let (bills, errs) = load("rent { day 1 }");
        assert!(errs.is_fatal());
        assert_eq!(labels!(errs), vec![("Parsing failure".to_string(), true)]);
        assert!(bills.is_empty());
        let (_, errs) = load("rent { daily 1; }");
        assert!(errs.is_fatal());
    }

    #[test]
    fn amounts() {
        assert_eq!(read_amount("850"), Some(Amount(85000)));
        assert_eq!(read_amount("850.5"), Some(Amount(85050)));
        assert_eq!(read_amount("850.05"), Some(Amount(85005)));
        assert_eq!(read_amount("-12.30"), Some(Amount(-1230)));
        assert_eq!(read_amount("99999999999999999999"), None);
    }

    #[test]
    fn empty_file() {
        let (bills, errs) = load("  # nothing yet\n");
        assert!(bills.is_empty());
        assert!(errs.is_empty());
    }
}
