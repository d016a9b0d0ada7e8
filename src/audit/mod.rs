//! Activity log
//!
//! Every create, update and delete of an expense or budget is appended to
//! `audit.log` as one JSON object per line, with the record's state before
//! and after the change and, for updates, a short field-by-field summary.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
