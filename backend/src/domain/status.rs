//! Orchestration of the student-status view.
//!
//! The REST layer calls into this service; it owns the fetch order
//! (children before anything else, groups before aggregation) and the
//! terminal no-children state for parent accounts.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::SchoolApi;
use crate::domain::attendance::aggregate_attendance;
use crate::domain::calendar::{parse_calendar_date, MonthCalendar};
use crate::domain::enrollment::enrolled_groups;
use crate::domain::identity::TargetIdentity;
use crate::domain::payments::{aggregate_payments, month_window, PAYMENT_WINDOW_MONTHS};
use crate::domain::statistics::{attendance_summary, payment_summary};
use shared::{
    Actor, AttendanceStatus, Child, GroupSummary, MonthCell, MonthlyTable, StatusOverview,
    StatusView, UserRole,
};

/// Aggregates the status view from the upstream school API.
#[derive(Clone)]
pub struct StatusService {
    api: Arc<dyn SchoolApi>,
}

impl StatusService {
    pub fn new(api: Arc<dyn SchoolApi>) -> Self {
        Self { api }
    }

    /// Build the full status view for an actor.
    pub async fn overview(&self, actor: &Actor, selected_child_id: Option<i64>) -> Result<StatusView> {
        self.overview_at(actor, selected_child_id, Local::now().date_naive())
            .await
    }

    /// Like [`overview`](Self::overview) with an explicit "today", so the
    /// payment window and overdue cutoff are deterministic under test.
    pub async fn overview_at(
        &self,
        actor: &Actor,
        selected_child_id: Option<i64>,
        today: NaiveDate,
    ) -> Result<StatusView> {
        let children = self.children_for(actor).await?;
        if actor.role == UserRole::Parent && children.is_empty() {
            info!("parent {} has no registered children", actor.id);
            return Ok(StatusView::NoChildren);
        }

        let target = TargetIdentity::resolve(actor, &children, selected_child_id)
            .ok_or_else(|| anyhow!("no target identity for actor {}", actor.id))?;

        let groups = self.api.list_groups().await?;
        let enrolled = enrolled_groups(&groups, &actor.email);
        info!(
            "actor {} enrolled in {} of {} groups",
            actor.id,
            enrolled.len(),
            groups.len()
        );

        let window = month_window(today, PAYMENT_WINDOW_MONTHS);
        let (attendance, payments) = tokio::join!(
            aggregate_attendance(self.api.as_ref(), target, &enrolled),
            aggregate_payments(self.api.as_ref(), target, &enrolled, &window),
        );

        let attendance_stats = attendance_summary(&attendance.records);
        let payment_stats = payment_summary(&payments.records, today);
        let display_name = children
            .iter()
            .find(|c| c.id == target.id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| actor.name.clone());

        let mut failed_slices = attendance.failed;
        failed_slices.extend(payments.failed);

        Ok(StatusView::Ready(StatusOverview {
            target: target.as_ref(),
            display_name,
            children,
            enrolled_groups: enrolled
                .iter()
                .map(|g| GroupSummary {
                    id: g.id,
                    name: g.display_name().to_string(),
                    education_level: g.education_level.clone(),
                    teacher_name: g.teacher_name.clone(),
                })
                .collect(),
            attendance: attendance.records,
            attendance_summary: attendance_stats,
            payments: payments.records,
            payment_summary: payment_stats,
            failed_slices,
        }))
    }

    /// Monthly drill-down table for one enrolled group.
    ///
    /// `month_key` selects an explicit month (`"YYYY-MM"`); without it the
    /// cursor starts on the current month when scheduled, otherwise on the
    /// most recent one. Returns `Ok(None)` when there is nothing to render:
    /// no resolvable target, group not enrolled, no scheduled dates, or an
    /// unknown explicit month.
    pub async fn group_monthly_table(
        &self,
        actor: &Actor,
        selected_child_id: Option<i64>,
        group_id: i64,
        month_key: Option<&str>,
    ) -> Result<Option<MonthlyTable>> {
        self.group_monthly_table_at(
            actor,
            selected_child_id,
            group_id,
            month_key,
            Local::now().date_naive(),
        )
        .await
    }

    pub async fn group_monthly_table_at(
        &self,
        actor: &Actor,
        selected_child_id: Option<i64>,
        group_id: i64,
        month_key: Option<&str>,
        today: NaiveDate,
    ) -> Result<Option<MonthlyTable>> {
        let children = self.children_for(actor).await?;
        let Some(target) = TargetIdentity::resolve(actor, &children, selected_child_id) else {
            return Ok(None);
        };

        let groups = self.api.list_groups().await?;
        let enrolled = enrolled_groups(&groups, &actor.email);
        let Some(group) = enrolled.into_iter().find(|g| g.id == group_id) else {
            info!("group {} not enrolled for actor {}", group_id, actor.id);
            return Ok(None);
        };

        let scheduled = self.api.scheduled_dates(group.id).await?;
        let dates: Vec<NaiveDate> = scheduled
            .dates
            .iter()
            .filter_map(|raw| {
                let parsed = parse_calendar_date(raw);
                if parsed.is_none() {
                    warn!("skipping unparsable scheduled date {:?} in group {}", raw, group.id);
                }
                parsed
            })
            .collect();
        let Some(mut calendar) = MonthCalendar::new(&dates, today) else {
            return Ok(None);
        };
        if let Some(key) = month_key {
            if !calendar.select(key) {
                return Ok(None);
            }
        }

        let (year, month) = calendar.current_period();
        let (history, statuses) = tokio::join!(
            self.api.attendance_history(group.id),
            self.api.payment_status(group.id, year, month),
        );
        // Drill-down slices degrade to empty data, same as the aggregators.
        let history = history.unwrap_or_else(|err| {
            warn!("attendance fetch failed for group {}: {}", group.id, err);
            Vec::new()
        });
        let statuses = statuses.unwrap_or_else(|err| {
            warn!(
                "payment fetch failed for group {} {}-{:02}: {}",
                group.id, year, month, err
            );
            Vec::new()
        });

        let user_history: Vec<_> = history.iter().filter(|r| target.matches(*r)).collect();
        let cells: Vec<MonthCell> = calendar
            .current_dates()
            .iter()
            .map(|&date| MonthCell {
                date,
                status: user_history
                    .iter()
                    .find(|r| r.raw_date().and_then(parse_calendar_date) == Some(date))
                    .map(|r| r.status),
            })
            .collect();

        let present = cells
            .iter()
            .filter(|c| c.status == Some(AttendanceStatus::Present))
            .count();
        let absent = cells
            .iter()
            .filter(|c| c.status == Some(AttendanceStatus::Absent))
            .count();
        let recorded = present + absent;
        let rate = if recorded > 0 {
            (present as f64 / recorded as f64 * 100.0).round() as u32
        } else {
            0
        };

        let payment = statuses.iter().find(|p| target.matches(*p));

        Ok(Some(MonthlyTable {
            group_id: group.id,
            group_name: group.display_name().to_string(),
            month_key: calendar.current_key().to_string(),
            month_index: calendar.cursor(),
            month_count: calendar.month_count(),
            cells,
            present,
            absent,
            rate,
            is_paid: payment.map(|p| p.is_paid).unwrap_or(false),
            amount: payment.and_then(|p| p.amount),
        }))
    }

    async fn children_for(&self, actor: &Actor) -> Result<Vec<Child>> {
        match actor.role {
            UserRole::Parent => Ok(self.api.list_children(actor.id).await?),
            UserRole::Student => Ok(Vec::new()),
        }
    }
}
