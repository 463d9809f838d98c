//! Due-task selection
//!
//! Computes the due-date window for a horizon and queries the store for
//! non-completed tasks inside it.

use chrono::{DateTime, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::task::{Task, TaskRepository};
use crate::Result;

/// Compute the due-date window for `today + horizon_days`: local
/// start-of-day through the same day's 23:59:59.999, as UTC instants.
pub fn due_window(today: NaiveDate, horizon_days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let target = today + Days::new(u64::from(horizon_days));
    let start_of_day = target.and_time(NaiveTime::MIN);
    let end_of_day = start_of_day + Duration::days(1) - Duration::milliseconds(1);
    (local_instant(start_of_day), local_instant(end_of_day))
}

// A local wall-clock time can be ambiguous or skipped around DST
// transitions; take the earliest mapping, or read the wall-clock as UTC
// if the instant does not exist locally.
fn local_instant(naive: NaiveDateTime) -> DateTime<Utc> {
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Query the store for non-completed tasks due within the horizon window.
///
/// An empty result is not an error; store failures propagate and fail
/// the sweep.
pub async fn select_due_tasks(
    repo: &dyn TaskRepository,
    horizon_days: u32,
) -> Result<Vec<Task>> {
    let (start, end) = due_window(Local::now().date_naive(), horizon_days);
    tracing::debug!(%start, %end, horizon_days, "querying for due tasks");
    repo.find_due_between(start, end).await
}
