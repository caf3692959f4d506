use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream school-API shapes
//
// These mirror the JSON the school backend returns (camelCase keys). Records
// arrive with whatever fields the backend managed to fill in, so everything
// that has been observed missing in the wild is optional with a default.
// ---------------------------------------------------------------------------

/// Role of the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Parent,
}

/// The authenticated caller of the status view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// A child registered under a parent account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
}

/// One entry in a group's assigned-student list. Matching is done by email;
/// entries without one never match anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStudent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A class/cohort as returned by `GET /api/groups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub students_assigned: Option<Vec<GroupStudent>>,
}

impl Group {
    /// Arabic display name when present, plain name otherwise.
    pub fn display_name(&self) -> &str {
        self.name_ar.as_deref().unwrap_or(&self.name)
    }
}

/// Attendance status for a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// One attendance row from a group's attendance history.
///
/// The backend links a row to a person through exactly one of two keys:
/// `userId` for directly enrolled students, `studentId` for a parent's
/// child. The date has historically appeared under either `attendanceDate`
/// or `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub attendance_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// The raw date string, whichever field the backend populated.
    pub fn raw_date(&self) -> Option<&str> {
        self.attendance_date.as_deref().or(self.date.as_deref())
    }
}

/// One payment row from a group's monthly payment status.
///
/// Virtual rows are placeholders synthesized by the backend for periods
/// with no real charge; aggregation must skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub payment_note: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
}

/// Response of `GET /api/groups/:id/scheduled-dates` (ISO calendar dates).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledDatesResponse {
    #[serde(default)]
    pub dates: Vec<String>,
}

// ---------------------------------------------------------------------------
// Aggregated view DTOs (our own API surface)
// ---------------------------------------------------------------------------

/// Which kind of person the records are being aggregated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A directly enrolled student (records keyed by `userId`).
    Student,
    /// A parent's child (records keyed by `studentId`).
    Child,
}

/// The resolved person whose records are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: i64,
    pub kind: TargetKind,
}

/// Group card data for the enrolled-groups section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    pub name: String,
    pub education_level: Option<String>,
    pub teacher_name: Option<String>,
}

/// An attendance record annotated with its source group, merged across
/// all enrolled groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// A normalized payment record for one (group, month) slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub year: i32,
    pub month: u32,
    /// Missing amounts render as "unspecified", never as an error.
    pub amount: Option<f64>,
    /// Synthesized as the first day of the billing month.
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub paid_date: Option<String>,
    pub note: Option<String>,
}

/// Presence/absence counts over an attendance list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total: usize,
    /// Present or late sessions (late counts toward the rate).
    pub present: usize,
    pub absent: usize,
    /// Rounded percentage in 0..=100; 0 when there are no records.
    pub rate: u32,
}

/// Money totals over a payment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    /// Unpaid records whose due date has passed.
    pub overdue_count: usize,
}

/// One (group) or (group, month) fetch that failed during aggregation.
/// The view stays usable; these let the caller show a partial-data banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedSlice {
    pub group_id: i64,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub message: String,
}

/// The fully aggregated status view for one target identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOverview {
    pub target: TargetRef,
    pub display_name: String,
    pub children: Vec<Child>,
    pub enrolled_groups: Vec<GroupSummary>,
    pub attendance: Vec<AttendanceEntry>,
    pub attendance_summary: AttendanceSummary,
    pub payments: Vec<PaymentEntry>,
    pub payment_summary: PaymentSummary,
    pub failed_slices: Vec<FailedSlice>,
}

/// Top-level outcome of the status view.
///
/// `NoChildren` is a terminal state for parent accounts with nothing
/// registered; it is not a loading state and not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum StatusView {
    NoChildren,
    Ready(StatusOverview),
}

/// One cell of the monthly drill-down table: a scheduled session date and
/// the target's recorded status, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub status: Option<AttendanceStatus>,
}

/// Per-group monthly attendance/payment table at the current cursor month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTable {
    pub group_id: i64,
    pub group_name: String,
    /// `"YYYY-MM"` key of the month being shown.
    pub month_key: String,
    /// Position of that month in the ordered month list (for "3 / 7" UI).
    pub month_index: usize,
    pub month_count: usize,
    pub cells: Vec<MonthCell>,
    /// Sessions recorded strictly `present` this month.
    pub present: usize,
    /// Sessions recorded strictly `absent` this month.
    pub absent: usize,
    /// Rounded percentage over recorded sessions; 0 when none recorded.
    pub rate: u32,
    pub is_paid: bool,
    pub amount: Option<f64>,
}
