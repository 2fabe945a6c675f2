//! Request types for the Leave Policy Engine API.
//!
//! This module defines the JSON request structures for the `/evaluate` endpoint.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LeaveRequest, LeaveType};

/// Request body for the `/evaluate` endpoint.
///
/// Mirrors what the hosting service has collected from the employee: who is
/// asking, what leave they want, and optionally their current balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The requesting employee.
    pub employee: EmployeeContext,
    /// The requested leave.
    pub leave: LeaveDetails,
    /// Balance snapshot from the HR system, if available.
    #[serde(default)]
    pub balance: Option<BalanceSnapshot>,
}

/// Employee context in an evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeContext {
    /// Unique identifier for the employee.
    pub id: String,
    /// Site/employment-type code (e.g., "FTE_CN_GZ").
    pub policy_group: String,
    /// Team used for the blackout and staffing lookup.
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Leave details in an evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDetails {
    /// The kind of leave.
    #[serde(default)]
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Requested duration in days.
    pub duration_days: Decimal,
    /// The date the request was submitted.
    pub submission_date: NaiveDate,
    /// Whether the request is marked urgent.
    #[serde(default)]
    pub urgent: bool,
    /// Reason given for an urgent request.
    #[serde(default)]
    pub urgency_justification: Option<String>,
}

/// Leave balance snapshot in an evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Days available for the requested leave type.
    pub available_days: Decimal,
}

impl From<EvaluationRequest> for LeaveRequest {
    fn from(req: EvaluationRequest) -> Self {
        LeaveRequest {
            employee_id: req.employee.id,
            policy_group: req.employee.policy_group,
            leave_type: req.leave.leave_type,
            team_id: req.employee.team_id,
            start_date: req.leave.start_date,
            end_date: req.leave.end_date,
            duration_days: req.leave.duration_days,
            submission_date: req.leave.submission_date,
            urgent: req.leave.urgent,
            urgency_justification: req.leave.urgency_justification,
            available_balance: req.balance.map(|b| b.available_days),
        }
    }
}
