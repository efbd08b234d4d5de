use std::fmt;

use crate::util::recurrence::RecurrenceRule;

/// Amount of money in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(pub i64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// A recurring bill as described in a rule file
///
/// Only `rule` takes part in scheduling, the rest is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub rule: RecurrenceRule,
    pub label: Option<String>,
    pub amount: Option<Amount>,
}

impl Bill {
    pub fn from(rule: RecurrenceRule) -> Self {
        Self { rule, label: None, amount: None }
    }

    /// Label if any, falls back to the rule id
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.rule.id)
    }
}
