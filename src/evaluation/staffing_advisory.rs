//! Staffing advisory assessment.
//!
//! Turns the staffing oracle's answer (or its absence) into advisories and
//! warnings. Staffing never produces a validation error: a blackout or a thin
//! team is information for the approvers, not a rejection.

use serde::{Deserialize, Serialize};

use crate::config::PolicyRuleSet;
use crate::models::{AdvisoryKind, AuditStep, DecisionWarning, LeaveRequest, WarningKind};
use crate::staffing::StaffingStatus;

/// What happened when the staffing oracle was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StaffingOutcome {
    /// The oracle was not consulted.
    NotChecked {
        /// Why the lookup was skipped.
        reason: String,
    },
    /// The oracle answered.
    Checked(StaffingStatus),
    /// The oracle failed or timed out.
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Advisories and warnings derived from a staffing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingAssessment {
    /// `DEFERRAL_ADVISORY` and/or `MINIMUM_STAFFING_NOT_MET`.
    pub advisories: Vec<AdvisoryKind>,
    /// `STAFFING_CHECK_UNAVAILABLE` when the oracle failed.
    pub warnings: Vec<DecisionWarning>,
    /// The audit step recording the assessment.
    pub audit_step: AuditStep,
}

/// Assesses a staffing outcome for a request.
///
/// # Examples
///
/// ```
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::{StaffingOutcome, assess_staffing};
/// use leave_policy_engine::models::{AdvisoryKind, LeaveRequest, LeaveType};
/// use leave_policy_engine::staffing::StaffingStatus;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let rule_set = loader.get_rule_set("FTE_CN_GZ", LeaveType::Annual, date(23)).unwrap();
///
/// let request = LeaveRequest {
///     employee_id: "EMP1001".to_string(),
///     policy_group: "FTE_CN_GZ".to_string(),
///     leave_type: LeaveType::Annual,
///     team_id: Some("datatech".to_string()),
///     start_date: date(23),
///     end_date: date(24),
///     duration_days: Decimal::from(2),
///     submission_date: date(2),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: None,
/// };
///
/// let outcome = StaffingOutcome::Checked(StaffingStatus {
///     is_blackout: true,
///     minimum_staffing_met: true,
/// });
/// let assessment = assess_staffing(&request, rule_set, &outcome, 7);
/// assert_eq!(assessment.advisories, vec![AdvisoryKind::DeferralAdvisory]);
/// assert!(assessment.warnings.is_empty());
/// assert_eq!(assessment.audit_step.clause_ref, "datatech-release-freeze");
/// ```
pub fn assess_staffing(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    outcome: &StaffingOutcome,
    step_number: u32,
) -> StaffingAssessment {
    let mut advisories = Vec::new();
    let mut warnings = Vec::new();

    let team = request.team_id.as_deref().unwrap_or("-");

    let (output, reasoning) = match outcome {
        StaffingOutcome::NotChecked { reason } => (
            serde_json::json!({ "checked": false }),
            format!("Staffing check skipped: {}", reason),
        ),
        StaffingOutcome::Checked(status) => {
            if status.is_blackout {
                advisories.push(AdvisoryKind::DeferralAdvisory);
            }
            if !status.minimum_staffing_met {
                advisories.push(AdvisoryKind::MinimumStaffingNotMet);
            }
            let reasoning = match (status.is_blackout, status.minimum_staffing_met) {
                (false, true) => format!("No staffing concern for team '{}'", team),
                (true, true) => format!(
                    "Leave overlaps a blackout window for team '{}', approvers may ask to defer",
                    team
                ),
                (false, false) => format!(
                    "Team '{}' would fall below minimum staffing during the leave",
                    team
                ),
                (true, false) => format!(
                    "Leave overlaps a blackout window and team '{}' would fall below minimum staffing",
                    team
                ),
            };
            (
                serde_json::json!({
                    "checked": true,
                    "is_blackout": status.is_blackout,
                    "minimum_staffing_met": status.minimum_staffing_met
                }),
                reasoning,
            )
        }
        StaffingOutcome::Unavailable { message } => {
            warnings.push(DecisionWarning {
                kind: WarningKind::StaffingCheckUnavailable,
                message: message.clone(),
            });
            (
                serde_json::json!({ "checked": false, "unavailable": true }),
                format!("Staffing check unavailable, no advisory produced: {}", message),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "staffing_advisory".to_string(),
        rule_name: "Blackout and Staffing Advisory".to_string(),
        clause_ref: rule_set.blackout_policy.clone().unwrap_or_default(),
        input: serde_json::json!({
            "team_id": request.team_id,
            "start_date": request.start_date.to_string(),
            "end_date": request.end_date.to_string()
        }),
        output,
        reasoning,
    };

    StaffingAssessment {
        advisories,
        warnings,
        audit_step,
    }
}
