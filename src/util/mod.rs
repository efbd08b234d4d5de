//! Implementations that are useful accross the whole project
//!
//! Calendar management, recurrence resolution, reminder slots
//! and the sanitization of rule fields

pub mod bill;
pub mod date;
pub mod recurrence;
pub mod sanitize;
pub mod slot;
