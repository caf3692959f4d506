//! Cross-group payment aggregation over a trailing window of months.
//!
//! One upstream request per (group, month) pair, all issued concurrently.
//! Virtual placeholder rows and months without a record for the target
//! contribute nothing; failed slices are reported, never fatal.

use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use tracing::{info, warn};

use crate::api::SchoolApi;
use crate::domain::identity::TargetIdentity;
use shared::{FailedSlice, Group, PaymentEntry};

/// How many trailing calendar months the payment view covers.
pub const PAYMENT_WINDOW_MONTHS: u32 = 6;

/// Normalized payments across the window, newest due date first, plus the
/// slices that could not be fetched.
#[derive(Debug, Clone, Default)]
pub struct PaymentAggregate {
    pub records: Vec<PaymentEntry>,
    pub failed: Vec<FailedSlice>,
}

/// The trailing `len` calendar months ending at `today`'s month, inclusive,
/// current month first.
pub fn month_window(today: NaiveDate, len: u32) -> Vec<(i32, u32)> {
    let mut window = Vec::with_capacity(len as usize);
    let (mut year, mut month) = (today.year(), today.month());
    for _ in 0..len {
        window.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    window
}

/// Fetch and normalize the target's payment record for every enrolled
/// group and every month in the window.
pub async fn aggregate_payments(
    api: &dyn SchoolApi,
    target: TargetIdentity,
    groups: &[Group],
    window: &[(i32, u32)],
) -> PaymentAggregate {
    let fetches = window.iter().flat_map(|&(year, month)| {
        groups.iter().map(move |group| async move {
            match api.payment_status(group.id, year, month).await {
                Ok(statuses) => Ok((group, year, month, statuses)),
                Err(err) => {
                    warn!(
                        "payment fetch failed for group {} {}-{:02}: {}",
                        group.id, year, month, err
                    );
                    Err(FailedSlice {
                        group_id: group.id,
                        year: Some(year),
                        month: Some(month),
                        message: err.to_string(),
                    })
                }
            }
        })
    });

    let mut aggregate = PaymentAggregate::default();
    for outcome in join_all(fetches).await {
        match outcome {
            Ok((group, year, month, statuses)) => {
                let Some(record) = statuses.iter().find(|p| target.matches(*p)) else {
                    continue;
                };
                if record.is_virtual {
                    continue;
                }
                let Some(due_date) = NaiveDate::from_ymd_opt(year, month, 1) else {
                    continue;
                };
                aggregate.records.push(PaymentEntry {
                    id: record.id,
                    group_id: group.id,
                    group_name: group.display_name().to_string(),
                    year,
                    month,
                    amount: record.amount,
                    due_date,
                    is_paid: record.is_paid,
                    paid_date: record.paid_date.clone(),
                    note: record.payment_note.clone(),
                });
            }
            Err(slice) => aggregate.failed.push(slice),
        }
    }

    aggregate.records.sort_by(|a, b| b.due_date.cmp(&a.due_date));

    info!(
        "aggregated {} payment records for target {} over {} months ({} slices failed)",
        aggregate.records.len(),
        target.id,
        window.len(),
        aggregate.failed.len()
    );
    aggregate
}
