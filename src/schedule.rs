//! Reminder table addressed by slot
//!
//! This is where rules meet the notification slots: scheduling a rule first
//! cancels whatever holds its slot, so a rule never accumulates reminders.

use log::{debug, warn};
use std::collections::BTreeMap;

use crate::util::{
    date::Instant,
    recurrence::{Due, RecurrenceRule},
    slot::{self, SlotId},
};

/// A pending reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub slot: SlotId,
    pub rule_id: String,
    pub due: Due,
}

/// At most one pending reminder per slot
#[derive(Debug, Default)]
pub struct Schedule {
    slots: BTreeMap<SlotId, Reminder>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule every rule in order against the same `now`
    pub fn plan<'r, I>(rules: I, now: Instant) -> Self
    where
        I: IntoIterator<Item = &'r RecurrenceRule>,
    {
        let mut schedule = Self::new();
        for rule in rules {
            schedule.reschedule(rule, now);
        }
        schedule
    }

    /// Cancel the reminder in the rule's slot and, if the rule is live,
    /// replace it with the next one
    ///
    /// Returns the cancelled reminder. It may belong to another rule that
    /// hashed to the same slot, in which case that rule loses its reminder.
    pub fn reschedule(&mut self, rule: &RecurrenceRule, now: Instant) -> Option<Reminder> {
        let slot = slot::derive_slot_id(&rule.id);
        let cancelled = self.slots.remove(&slot);
        if let Some(old) = &cancelled {
            if old.rule_id != rule.id {
                warn!(
                    "slot {} shared by '{}' and '{}', keeping '{}'",
                    slot, old.rule_id, rule.id, rule.id
                );
            }
        }
        match rule.resolve(now) {
            Some(due) => {
                debug!("'{}' in slot {} at {}", rule.id, slot, due);
                self.slots.insert(slot, Reminder { slot, rule_id: rule.id.clone(), due });
            }
            None => debug!("'{}' is not live, slot {} left empty", rule.id, slot),
        }
        cancelled
    }

    /// Drop the pending reminder of `rule_id`, if it still holds its slot
    pub fn cancel(&mut self, rule_id: &str) -> Option<Reminder> {
        let slot = slot::derive_slot_id(rule_id);
        if self.slots.get(&slot)?.rule_id == rule_id {
            self.slots.remove(&slot)
        } else {
            None
        }
    }

    pub fn get(&self, slot: SlotId) -> Option<&Reminder> {
        self.slots.get(&slot)
    }

    /// Pending reminder of `rule_id`
    pub fn find(&self, rule_id: &str) -> Option<&Reminder> {
        self.get(slot::derive_slot_id(rule_id))
            .filter(|rem| rem.rule_id == rule_id)
    }

    /// Reminders in the order they fire, ties broken by slot
    pub fn reminders(&self) -> Vec<&Reminder> {
        let mut v = self.slots.values().collect::<Vec<_>>();
        v.sort_by_key(|rem| (rem.due.at, rem.slot));
        v
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
