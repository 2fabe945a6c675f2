//! Approval chain resolution functionality.
//!
//! This module maps a requested duration onto the rule set's approval bands.
//! Bands are contiguous and upper-inclusive: with bands of 2, 5 and 10 days,
//! 2 days routes to the first band, 2.5 and 5 days to the second.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PolicyRuleSet;
use crate::models::{ApprovalStep, AuditStep, LeaveRequest};

/// The resolved approval chain for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalChainResolution {
    /// Ordered approvers, every one required.
    pub chain: Vec<ApprovalStep>,
    /// True when the exception band was used.
    pub escalation: bool,
    /// The audit step recording the resolution.
    pub audit_step: AuditStep,
}

/// Resolves the approval chain for a request.
///
/// Returns the roles of the narrowest band whose `max_duration` covers the
/// requested duration. The exception roles are returned, with `escalation`
/// set, when no band covers the duration or when `exceeds_max` reports that
/// the consecutive-days limit was broken. A non-positive duration has no
/// meaningful chain and resolves to an empty one without escalation.
///
/// # Arguments
///
/// * `request` - The leave request
/// * `rule_set` - The governing policy rule set
/// * `exceeds_max` - Result of the consecutive days check
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```no_run
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::resolve_approval_chain;
/// use leave_policy_engine::models::{ApprovalRole, LeaveRequest, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
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
///     end_date: date(16),
///     duration_days: Decimal::from(6),
///     submission_date: date(1),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: None,
/// };
///
/// let result = resolve_approval_chain(&request, rule_set, false, 1);
/// assert!(!result.escalation);
/// assert_eq!(result.chain.len(), 3);
/// assert_eq!(result.chain[2].role, ApprovalRole::Hrbp);
/// ```
pub fn resolve_approval_chain(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    exceeds_max: bool,
    step_number: u32,
) -> ApprovalChainResolution {
    let rules = &rule_set.approval;
    let duration = request.duration_days;

    let (roles, escalation, band_str, reasoning) = if duration <= Decimal::ZERO {
        (
            Vec::new(),
            false,
            "none".to_string(),
            format!(
                "Duration of {} days is not positive, no approval chain applies",
                duration.normalize()
            ),
        )
    } else if exceeds_max {
        (
            rules.exception.roles.clone(),
            true,
            "exception".to_string(),
            "Request exceeds the maximum consecutive days, exception chain applies".to_string(),
        )
    } else {
        match rules.band_for(duration) {
            Some(band) => (
                band.roles.clone(),
                false,
                format!("up_to_{}", band.max_duration.normalize()),
                format!(
                    "{} days falls within the band up to {} days",
                    duration.normalize(),
                    band.max_duration.normalize()
                ),
            ),
            None => {
                let top = rules
                    .bands
                    .last()
                    .map(|band| band.max_duration)
                    .unwrap_or_default();
                (
                    rules.exception.roles.clone(),
                    true,
                    "exception".to_string(),
                    format!(
                        "{} days exceeds the largest band of {} days, exception chain applies",
                        duration.normalize(),
                        top.normalize()
                    ),
                )
            }
        }
    };

    let chain = ApprovalStep::chain(&roles);

    let audit_step = AuditStep {
        step_number,
        rule_id: "approval_chain".to_string(),
        rule_name: "Approval Chain Resolution".to_string(),
        clause_ref: rules.clause.clone(),
        input: serde_json::json!({
            "duration_days": duration.normalize().to_string(),
            "exceeds_max_consecutive": exceeds_max
        }),
        output: serde_json::json!({
            "band": band_str,
            "roles": roles,
            "escalation": escalation
        }),
        reasoning,
    };

    ApprovalChainResolution {
        chain,
        escalation,
        audit_step,
    }
}
