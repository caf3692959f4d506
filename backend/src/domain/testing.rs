//! In-memory [`SchoolApi`] fake and record builders shared by the domain
//! and REST tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{ApiError, SchoolApi};
use shared::{
    Actor, AttendanceRecord, AttendanceStatus, Child, Group, GroupStudent, PaymentRecord,
    ScheduledDatesResponse, UserRole,
};

/// Canned upstream backend. Slices listed in the `failing_*` sets answer
/// with a 500; everything else returns what was loaded into the maps.
#[derive(Default)]
pub struct FakeSchoolApi {
    pub children: Vec<Child>,
    pub groups: Vec<Group>,
    pub attendance: HashMap<i64, Vec<AttendanceRecord>>,
    pub payments: HashMap<(i64, i32, u32), Vec<PaymentRecord>>,
    pub scheduled: HashMap<i64, Vec<String>>,
    pub failing_attendance: HashSet<i64>,
    pub failing_payments: HashSet<(i64, i32, u32)>,
    /// Total number of upstream requests served (including failures).
    pub calls: AtomicUsize,
}

impl FakeSchoolApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(path: String) -> ApiError {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            path,
        }
    }
}

#[async_trait]
impl SchoolApi for FakeSchoolApi {
    async fn list_children(&self, parent_id: i64) -> Result<Vec<Child>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .children
            .iter()
            .filter(|c| c.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.groups.clone())
    }

    async fn attendance_history(&self, group_id: i64) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_attendance.contains(&group_id) {
            return Err(Self::fail(format!(
                "/api/groups/{}/attendance-history",
                group_id
            )));
        }
        Ok(self.attendance.get(&group_id).cloned().unwrap_or_default())
    }

    async fn payment_status(
        &self,
        group_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<PaymentRecord>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_payments.contains(&(group_id, year, month)) {
            return Err(Self::fail(format!(
                "/api/groups/{}/payment-status/{}/{}",
                group_id, year, month
            )));
        }
        Ok(self
            .payments
            .get(&(group_id, year, month))
            .cloned()
            .unwrap_or_default())
    }

    async fn scheduled_dates(&self, group_id: i64) -> Result<ScheduledDatesResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScheduledDatesResponse {
            dates: self.scheduled.get(&group_id).cloned().unwrap_or_default(),
        })
    }
}

pub fn student_actor(id: i64, email: &str) -> Actor {
    Actor {
        id,
        name: format!("student_{}", id),
        email: email.to_string(),
        role: UserRole::Student,
    }
}

pub fn parent_actor(id: i64, email: &str) -> Actor {
    Actor {
        id,
        name: format!("parent_{}", id),
        email: email.to_string(),
        role: UserRole::Parent,
    }
}

pub fn child(id: i64, parent_id: i64) -> Child {
    Child {
        id,
        name: format!("child_{}", id),
        parent_id,
        education_level: None,
        birth_date: None,
    }
}

pub fn group_with_students(id: i64, name: &str, emails: &[&str]) -> Group {
    Group {
        id,
        name: name.to_string(),
        name_ar: None,
        education_level: Some("primary".to_string()),
        teacher_name: None,
        students_assigned: Some(
            emails
                .iter()
                .map(|email| GroupStudent {
                    id: None,
                    name: None,
                    email: Some(email.to_string()),
                })
                .collect(),
        ),
    }
}

pub fn attendance_record(
    id: i64,
    user_id: Option<i64>,
    student_id: Option<i64>,
    date: &str,
    status: AttendanceStatus,
) -> AttendanceRecord {
    AttendanceRecord {
        id,
        user_id,
        student_id,
        attendance_date: Some(date.to_string()),
        date: None,
        status,
    }
}

pub fn payment_record(id: i64, user_id: Option<i64>, amount: Option<f64>, is_paid: bool) -> PaymentRecord {
    PaymentRecord {
        id,
        user_id,
        student_id: None,
        amount,
        is_paid,
        paid_date: None,
        payment_note: None,
        is_virtual: false,
    }
}
