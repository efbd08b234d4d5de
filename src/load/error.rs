//! Pretty-printing facility for error messages
//!
//! In fairness, this is mostly a wrapper around `pest::error::Error::new_from_span`,
//! the difficult part of the formatting is handled and `Error` only adds aggregation
//! of messages as well as colored output.
//!
//! # Example
//!
//! ```ignore
//! errs.make("Unusable field value")
//!     .nonfatal()
//!     .span(&loc, "'32' is not a valid day of the month")
//!     .text("Using 1 instead")
//!     .hint("days of the month are 1 ..= 31, shorter months use their last day")
//! ```
//!
//! ```txt
//! --> Warning: Unusable field value
//!  |     --> bills.ech:4:5
//!  |      |
//!  |    4 |     day 32;
//!  |      |     ^----^
//!  |      |
//!  |      = '32' is not a valid day of the month
//!  |  Using 1 instead
//!  |      ? hint: days of the month are 1 ..= 31, shorter months use their last day
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of an error
///
/// Contains information on the file in which the error
/// occured and the precise span within that file
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// Report for a single error
///
/// All messages (`label` passed with `make`, arguments of `hint`
/// and `text`) should fit in a single line.
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// determines the error label (warning/error) and the color (yellow/red)
    fatal: bool,
    /// name of the error
    label: String,
    items: Vec<Item>,
}

/// Kinds of items that can be added to an error report
#[derive(Debug)]
enum Item {
    /// code block
    Block(Box<pest::error::Error<Rule>>),
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

/// A collection of errors
///
/// Typically to keep record of all errors detected in one file,
/// but the structure itself makes no assumption regarding the
/// spatial or semantic relationship between these errors
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    contents: Vec<Error>,
}

impl Error {
    /// Create a new error
    pub fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Add a pre-existing error (e.g. to build from a parsing error)
    pub fn from(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items
            .push(Item::Block(Box::new(err.renamed_rules(rule_rename))));
        self
    }

    /// Mark as a warning rather that a fatal error
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Add a code block and its associated message
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Block(Box::new(
            pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError {
                    message: msg.to_string(),
                },
                loc.1,
            )
            .with_path(loc.0),
        )));
        self
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Record {
    /// Initialize a new pool of errors (e.g. to record errors from another file)
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any of the recorded errors are fatal
    pub fn is_fatal(&self) -> bool {
        self.contents.iter().any(|e| e.fatal)
    }

    /// Number of fatal errors
    pub fn count_errors(&self) -> usize {
        self.contents.iter().filter(|e| e.fatal).count()
    }

    /// Number of nonfatal errors
    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// All reports in the order they were made
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.contents.iter()
    }

    /// Add a new error to the pool
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        let idx = self.contents.len();
        self.contents.push(Error::new(msg));
        &mut self.contents[idx]
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, header) = if self.fatal {
            (RED, "--> Error")
        } else {
            (YELLOW, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Block(err) => {
                    let mut align = "   ".to_string();
                    let mut align_found = false;
                    for line in format!("{}", err).split('\n') {
                        write!(
                            f,
                            " {}|{}  {}",
                            color,
                            if align_found { &align } else { "" },
                            BLUE
                        )?;
                        for c in line.chars() {
                            match c {
                                '-' if !align_found => {
                                    align_found = true;
                                    write!(f, "{}-", align)?;
                                }
                                ' ' if !align_found => {
                                    align.pop();
                                    write!(f, " ")?;
                                }
                                '|' => write!(f, "|{}", NONE)?,
                                '=' => write!(f, "={}", NONE)?,
                                '^' => write!(f, "{}^", color)?,
                                '␊' => (), // pest marks line endings inside spans
                                _ => write!(f, "{}", c)?,
                            }
                        }
                        writeln!(f)?;
                    }
                }
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        let fatal = self.is_fatal();
        let count = if fatal {
            self.count_errors()
        } else {
            self.count_warnings()
        };
        let color = if fatal { RED } else { YELLOW };
        let trunc = 10;
        for err in self
            .contents
            .iter()
            .filter(|err| err.fatal == fatal)
            .take(trunc)
        {
            // only print errors with the maximum fatality
            writeln!(f, "{}", err)?;
        }
        if count > trunc {
            writeln!(f, "{} And {} more.", color, count - trunc)?;
        }
        let plural = if count > 1 { "s" } else { "" };
        if fatal {
            writeln!(
                f,
                "{}Fatal: {}{} error{} emitted{}",
                color, WHITE, count, plural, NONE
            )?;
        } else {
            writeln!(
                f,
                "{}Nonfatal: {}{} warning{} emitted{}",
                color, WHITE, count, plural, NONE
            )?;
        }
        Ok(())
    }
}

#[allow(unreachable_patterns)]
fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "EOF",
        Rule::identifier => "a rule identifier composed of a..zA..Z0..9-_",
        Rule::string => "a string of non-'\"' characters",
        Rule::quoted => "a quoted string ('\"foo\"')",
        Rule::raw => "a value without whitespace or ';'",
        Rule::money_amount => "a monetary value ('XXX.XX')",
        Rule::field_day => "a 'day' field ('day 31;')",
        Rule::field_lead => "a 'lead' field ('lead 2;')",
        Rule::field_time => "an 'at' field ('at 09:00;')",
        Rule::field_label => "a 'label' field ('label \"Rent\";')",
        Rule::field_amount => "an 'amount' field ('amount 850.00;')",
        Rule::flag_paused => "the 'paused' flag",
        Rule::flag_muted => "the 'muted' flag",
        Rule::rule_block => "a rule 'name { ... }'",
        _ => "a separator",
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn severity_counts() {
        let mut errs = Record::new();
        assert!(errs.is_empty());
        assert!(!errs.is_fatal());
        errs.make("Unusable field value").nonfatal().text("Using 1 instead");
        assert!(!errs.is_fatal());
        assert_eq!(errs.count_warnings(), 1);
        errs.make("Duplicate rule").hint("rename one of the rules");
        assert!(errs.is_fatal());
        assert_eq!(errs.count_errors(), 1);
        assert_eq!(errs.count_warnings(), 1);
        let labels = errs.iter().map(|e| e.label()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Unusable field value", "Duplicate rule"]);
    }

    #[test]
    fn only_highest_severity_is_printed() {
        let mut errs = Record::new();
        errs.make("Unusable field value").nonfatal();
        let out = format!("{}", errs);
        assert!(out.contains("Unusable field value"));
        assert!(out.contains("1 warning emitted"));
        errs.make("Duplicate rule");
        let out = format!("{}", errs);
        assert!(!out.contains("Unusable field value"));
        assert!(out.contains("Duplicate rule"));
        assert!(out.contains("1 error emitted"));
    }

    #[test]
    fn truncated_listing() {
        let mut errs = Record::new();
        for i in 0..12 {
            errs.make(format!("Failure {}", i));
        }
        let out = format!("{}", errs);
        assert!(out.contains("Failure 9"));
        assert!(!out.contains("Failure 10"));
        assert!(out.contains("And 2 more."));
        assert!(out.contains("12 errors emitted"));
    }
}
