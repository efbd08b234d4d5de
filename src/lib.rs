//! Due dates and reminder slots for recurring bills
//!
//! The calculators in `util` are pure: the current instant is always passed
//! in, nothing reads the clock or touches storage. `schedule` ties them to a
//! table of reminders, `load` and `cli` make up the command line front end.

pub mod cli;
pub mod load;
pub mod schedule;
pub mod util;

pub use schedule::{Reminder, Schedule};
pub use util::{
    date::{Date, Instant, Month, Time},
    recurrence::{due_instant, next_occurrence, occurrence_in, upcoming, Due, RecurrenceRule, RuleBuilder},
    sanitize::{clamp_day_of_month, clamp_lead_time_days, normalize_time_of_day, Sanitized},
    slot::{derive_slot_id, SlotId, BAND_END, BAND_START},
};
