//! Leave balance checking functionality.
//!
//! The engine does not own leave balances. When the caller attaches a balance
//! snapshot to the request, this check compares it with the requested duration.

use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, LeaveRequest, ValidationErrorKind};

/// The result of checking a request against its balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceCheck {
    /// `INSUFFICIENT_BALANCE` when the snapshot does not cover the duration.
    pub error: Option<ValidationErrorKind>,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Checks the requested duration against the request's balance snapshot.
///
/// Without a snapshot the check is skipped, and the audit step says so.
///
/// # Examples
///
/// ```
/// use leave_policy_engine::evaluation::check_leave_balance;
/// use leave_policy_engine::models::{LeaveRequest, LeaveType, ValidationErrorKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let request = LeaveRequest {
///     employee_id: "EMP1001".to_string(),
///     policy_group: "FTE_CN_GZ".to_string(),
///     leave_type: LeaveType::Annual,
///     team_id: None,
///     start_date: date(9),
///     end_date: date(13),
///     duration_days: Decimal::from(5),
///     submission_date: date(1),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: Some(Decimal::from(3)),
/// };
///
/// let result = check_leave_balance(&request, 1);
/// assert_eq!(result.error, Some(ValidationErrorKind::InsufficientBalance));
/// ```
pub fn check_leave_balance(request: &LeaveRequest, step_number: u32) -> LeaveBalanceCheck {
    let requested = request.duration_days;

    let (error, reasoning) = match request.available_balance {
        None => (
            None,
            "No balance snapshot supplied, balance check skipped".to_string(),
        ),
        Some(balance) if balance < requested => (
            Some(ValidationErrorKind::InsufficientBalance),
            format!(
                "Requested {} days exceeds available balance of {} days",
                requested.normalize(),
                balance.normalize()
            ),
        ),
        Some(balance) => (
            None,
            format!(
                "Available balance of {} days covers the requested {} days",
                balance.normalize(),
                requested.normalize()
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_balance".to_string(),
        rule_name: "Leave Balance".to_string(),
        clause_ref: "balance snapshot".to_string(),
        input: serde_json::json!({
            "duration_days": requested.normalize().to_string(),
            "available_balance": request.available_balance.map(|b| b.normalize().to_string())
        }),
        output: serde_json::json!({
            "checked": request.available_balance.is_some(),
            "sufficient": error.is_none()
        }),
        reasoning,
    };

    LeaveBalanceCheck { error, audit_step }
}
