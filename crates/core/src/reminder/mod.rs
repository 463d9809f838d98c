//! Deadline reminder pipeline
//!
//! A sweep selects non-completed tasks due within a horizon, groups them
//! per assignee, enriches each group with recipient and team data,
//! renders a plain-text and an HTML reminder, and dispatches them
//! through an injected mail transport. Per-recipient failures are
//! absorbed; only the initial due-task query can fail a sweep.

pub mod aggregator;
pub mod dispatcher;
pub mod enricher;
pub mod formatter;
pub mod mailer;
pub mod selector;
mod sweep;

pub use dispatcher::{DeliveryOutcome, Dispatcher};
pub use enricher::EnrichedTask;
pub use mailer::{Mailer, OutgoingEmail, SmtpMailer, SmtpSettings};
pub use sweep::{ReminderConfig, ReminderService};
