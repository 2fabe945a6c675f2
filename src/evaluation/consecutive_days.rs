//! Maximum consecutive days checking functionality.
//!
//! A single request may not cover more days than the rule set's
//! `consecutive.max_days`. Exceeding it is a validation error and also forces
//! the exception approval chain.

use serde::{Deserialize, Serialize};

use crate::config::{ConsecutiveDayBasis, PolicyRuleSet};
use crate::models::{AuditStep, LeaveRequest, ValidationErrorKind};

/// The result of the consecutive days check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsecutiveDaysCheck {
    /// Days counted against the limit.
    pub counted_days: i64,
    /// True when `counted_days` is above the limit.
    pub exceeds_max: bool,
    /// `EXCEEDS_MAX_CONSECUTIVE` when the limit is exceeded.
    pub error: Option<ValidationErrorKind>,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Counts the days a request covers and compares them with the limit.
///
/// With the default [`ConsecutiveDayBasis::Calendar`] basis every day in the
/// inclusive `[start_date, end_date]` span counts. With
/// [`ConsecutiveDayBasis::WorkingDays`] only Monday to Friday count. A reversed
/// range counts as zero days; the validator reports it separately.
///
/// # Examples
///
/// ```no_run
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::check_consecutive_days;
/// use leave_policy_engine::models::{LeaveRequest, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let rule_set = loader.get_rule_set("FTE_CN_GZ", LeaveType::Annual, date(2)).unwrap();
///
/// // Monday 2 March to Thursday 12 March: 11 calendar days
/// let request = LeaveRequest {
///     employee_id: "EMP1001".to_string(),
///     policy_group: "FTE_CN_GZ".to_string(),
///     leave_type: LeaveType::Annual,
///     team_id: None,
///     start_date: date(2),
///     end_date: date(12),
///     duration_days: Decimal::from(9),
///     submission_date: date(1),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: None,
/// };
///
/// let result = check_consecutive_days(&request, rule_set, 1);
/// assert_eq!(result.counted_days, 11);
/// assert!(result.exceeds_max);
/// ```
pub fn check_consecutive_days(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    step_number: u32,
) -> ConsecutiveDaysCheck {
    let rules = &rule_set.consecutive;

    let (counted_days, basis_str) = match rules.basis {
        ConsecutiveDayBasis::Calendar => (request.span_days().max(0), "calendar"),
        ConsecutiveDayBasis::WorkingDays => (request.working_days_in_span(), "working_days"),
    };

    let exceeds_max = counted_days > rules.max_days;
    let error = exceeds_max.then_some(ValidationErrorKind::ExceedsMaxConsecutive);

    let unit = match rules.basis {
        ConsecutiveDayBasis::Calendar => "calendar days",
        ConsecutiveDayBasis::WorkingDays => "working days",
    };
    let reasoning = if exceeds_max {
        format!(
            "{} {} exceeds the maximum of {} consecutive days, escalation required",
            counted_days, unit, rules.max_days
        )
    } else {
        format!(
            "{} {} is within the maximum of {} consecutive days",
            counted_days, unit, rules.max_days
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "max_consecutive_days".to_string(),
        rule_name: "Maximum Consecutive Days".to_string(),
        clause_ref: rules.clause.clone(),
        input: serde_json::json!({
            "start_date": request.start_date.to_string(),
            "end_date": request.end_date.to_string(),
            "basis": basis_str,
            "max_days": rules.max_days
        }),
        output: serde_json::json!({
            "counted_days": counted_days,
            "exceeds_max": exceeds_max
        }),
        reasoning,
    };

    ConsecutiveDaysCheck {
        counted_days,
        exceeds_max,
        error,
        audit_step,
    }
}
