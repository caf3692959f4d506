//! Derived statistics over aggregated attendance and payment lists.

use chrono::NaiveDate;
use shared::{AttendanceEntry, AttendanceStatus, AttendanceSummary, PaymentEntry, PaymentSummary};

/// Presence/absence counts and rate. Late sessions count toward presence
/// for rate purposes; only `absent` counts as an absence.
pub fn attendance_summary(records: &[AttendanceEntry]) -> AttendanceSummary {
    let total = records.len();
    let present = records
        .iter()
        .filter(|r| matches!(r.status, AttendanceStatus::Present | AttendanceStatus::Late))
        .count();
    let absent = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Absent)
        .count();
    let rate = if total > 0 {
        (present as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };
    AttendanceSummary {
        total,
        present,
        absent,
        rate,
    }
}

/// Money totals. Records without an amount contribute zero; a record is
/// overdue when unpaid and its due date is in the past.
pub fn payment_summary(records: &[PaymentEntry], today: NaiveDate) -> PaymentSummary {
    let total_amount: f64 = records.iter().map(|r| r.amount.unwrap_or(0.0)).sum();
    let paid_amount: f64 = records
        .iter()
        .filter(|r| r.is_paid)
        .map(|r| r.amount.unwrap_or(0.0))
        .sum();
    let overdue_count = records
        .iter()
        .filter(|r| !r.is_paid && r.due_date < today)
        .count();
    PaymentSummary {
        total_amount,
        paid_amount,
        pending_amount: total_amount - paid_amount,
        overdue_count,
    }
}
