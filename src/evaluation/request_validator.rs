//! Request validation functionality.
//!
//! This module checks a leave request's duration, dates and advance notice
//! against a policy rule set. Every check runs; problems are collected as
//! [`ValidationErrorKind`] values instead of aborting the evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PolicyRuleSet;
use crate::models::{AdvisoryKind, AuditStep, LeaveRequest, ValidationErrorKind};

/// The result of validating a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestValidation {
    /// Validation errors, in the order the checks ran.
    pub errors: Vec<ValidationErrorKind>,
    /// Advisories raised while validating (urgent exception waivers).
    pub advisories: Vec<AdvisoryKind>,
    /// One audit step per check.
    pub audit_steps: Vec<AuditStep>,
}

/// Validates a leave request against a rule set.
///
/// Runs three checks, each recording an audit step:
///
/// 1. **Duration**: the duration must be positive (`INVALID_DURATION`) and a
///    multiple of the rule set's unit granularity (`INVALID_UNIT`).
/// 2. **Date range**: the end date must not precede the start date and the
///    request must not be submitted after it starts (`INVALID_DATE_RANGE`).
/// 3. **Advance notice**: the lead time (calendar days from submission to
///    start, submission day excluded) must reach the `min_notice_days` of the
///    first notice band covering the duration (`INSUFFICIENT_NOTICE`). An
///    urgent request with a non-blank justification is waived and gets the
///    `URGENT_EXCEPTION_GRANTED` advisory instead.
///
/// # Arguments
///
/// * `request` - The leave request to validate
/// * `rule_set` - The governing policy rule set
/// * `step_number` - The step number of the first audit step
///
/// # Examples
///
/// ```no_run
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::validate_request;
/// use leave_policy_engine::models::{LeaveRequest, LeaveType, ValidationErrorKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let rule_set = loader.get_rule_set("FTE_CN_GZ", LeaveType::Annual, date(9)).unwrap();
///
/// let request = LeaveRequest {
///     employee_id: "EMP1001".to_string(),
///     policy_group: "FTE_CN_GZ".to_string(),
///     leave_type: LeaveType::Annual,
///     team_id: None,
///     start_date: date(9),
///     end_date: date(12),
///     duration_days: Decimal::from_str("4").unwrap(),
///     submission_date: date(8),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: None,
/// };
///
/// let result = validate_request(&request, rule_set, 1);
/// assert_eq!(result.errors, vec![ValidationErrorKind::InsufficientNotice]);
/// ```
pub fn validate_request(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    step_number: u32,
) -> RequestValidation {
    let mut errors = Vec::new();
    let mut advisories = Vec::new();

    let duration_step = check_duration(request, rule_set, step_number, &mut errors);
    let date_range_step = check_date_range(request, step_number + 1, &mut errors);
    let notice_step = check_notice(
        request,
        rule_set,
        step_number + 2,
        &mut errors,
        &mut advisories,
    );

    RequestValidation {
        errors,
        advisories,
        audit_steps: vec![duration_step, date_range_step, notice_step],
    }
}

/// Clause reference for checks on the request's own shape rather than a policy clause.
const REQUEST_CLAUSE_REF: &str = "request";

fn check_duration(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    step_number: u32,
    errors: &mut Vec<ValidationErrorKind>,
) -> AuditStep {
    let duration = request.duration_days;
    let granularity = rule_set.unit_granularity;

    let positive = duration > Decimal::ZERO;
    let whole_units = granularity > Decimal::ZERO && (duration % granularity).is_zero();

    if !positive {
        errors.push(ValidationErrorKind::InvalidDuration);
    }
    if !whole_units {
        errors.push(ValidationErrorKind::InvalidUnit);
    }

    let reasoning = match (positive, whole_units) {
        (true, true) => format!(
            "{} days is a positive multiple of the {} day unit",
            duration.normalize(),
            granularity.normalize()
        ),
        (false, true) => format!(
            "{} days is not a positive duration",
            duration.normalize()
        ),
        (true, false) => format!(
            "{} days is not a multiple of the {} day unit",
            duration.normalize(),
            granularity.normalize()
        ),
        (false, false) => format!(
            "{} days is neither positive nor a multiple of the {} day unit",
            duration.normalize(),
            granularity.normalize()
        ),
    };

    AuditStep {
        step_number,
        rule_id: "duration_validation".to_string(),
        rule_name: "Duration and Unit Validation".to_string(),
        clause_ref: REQUEST_CLAUSE_REF.to_string(),
        input: serde_json::json!({
            "duration_days": duration.normalize().to_string(),
            "unit_granularity": granularity.normalize().to_string()
        }),
        output: serde_json::json!({
            "positive": positive,
            "whole_units": whole_units
        }),
        reasoning,
    }
}

fn check_date_range(
    request: &LeaveRequest,
    step_number: u32,
    errors: &mut Vec<ValidationErrorKind>,
) -> AuditStep {
    let end_before_start = request.end_date < request.start_date;
    let submitted_late = request.submission_date > request.start_date;

    if end_before_start || submitted_late {
        errors.push(ValidationErrorKind::InvalidDateRange);
    }

    let reasoning = if end_before_start {
        format!(
            "End date {} precedes start date {}",
            request.end_date, request.start_date
        )
    } else if submitted_late {
        format!(
            "Submitted on {}, after leave starting {}",
            request.submission_date, request.start_date
        )
    } else {
        format!(
            "Leave from {} to {} submitted on {}",
            request.start_date, request.end_date, request.submission_date
        )
    };

    AuditStep {
        step_number,
        rule_id: "date_range_validation".to_string(),
        rule_name: "Date Range Validation".to_string(),
        clause_ref: REQUEST_CLAUSE_REF.to_string(),
        input: serde_json::json!({
            "start_date": request.start_date.to_string(),
            "end_date": request.end_date.to_string(),
            "submission_date": request.submission_date.to_string()
        }),
        output: serde_json::json!({
            "valid": !end_before_start && !submitted_late
        }),
        reasoning,
    }
}

fn check_notice(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    step_number: u32,
    errors: &mut Vec<ValidationErrorKind>,
    advisories: &mut Vec<AdvisoryKind>,
) -> AuditStep {
    let lead_days = request.lead_days();
    let required = rule_set
        .notice
        .band_for(request.duration_days)
        .map(|band| band.min_notice_days)
        .unwrap_or_default();

    let sufficient = lead_days >= required;
    let waived = !sufficient && request.has_urgent_justification();

    if waived {
        advisories.push(AdvisoryKind::UrgentExceptionGranted);
    } else if !sufficient {
        errors.push(ValidationErrorKind::InsufficientNotice);
    }

    let reasoning = if sufficient {
        format!(
            "{} days' notice meets the {} day minimum for {} days of leave",
            lead_days,
            required,
            request.duration_days.normalize()
        )
    } else if waived {
        format!(
            "{} days' notice is below the {} day minimum; waived for an urgent request with justification",
            lead_days, required
        )
    } else if request.urgent {
        format!(
            "{} days' notice is below the {} day minimum; urgent flag set without a justification",
            lead_days, required
        )
    } else {
        format!(
            "{} days' notice is below the {} day minimum for {} days of leave",
            lead_days,
            required,
            request.duration_days.normalize()
        )
    };

    AuditStep {
        step_number,
        rule_id: "advance_notice".to_string(),
        rule_name: "Advance Notice".to_string(),
        clause_ref: rule_set.notice.clause.clone(),
        input: serde_json::json!({
            "duration_days": request.duration_days.normalize().to_string(),
            "lead_days": lead_days,
            "urgent": request.urgent,
            "has_justification": request.has_urgent_justification()
        }),
        output: serde_json::json!({
            "min_notice_days": required,
            "sufficient": sufficient,
            "waived": waived
        }),
        reasoning,
    }
}
