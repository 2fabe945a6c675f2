//! Decision models for the Leave Policy Engine.
//!
//! This module contains the [`Decision`] returned for every evaluated leave
//! request, together with the error, advisory, warning and audit types it is
//! assembled from.

use serde::{Deserialize, Serialize};

use super::{ApprovalRole, ApprovalStep};

/// A recoverable problem with a leave request.
///
/// Validation errors never stop an evaluation; they are all collected so the
/// requester gets complete feedback in one round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    /// Duration is not a multiple of the policy's unit granularity.
    InvalidUnit,
    /// Duration is zero or negative.
    InvalidDuration,
    /// End date precedes start date, or the request was submitted after it starts.
    InvalidDateRange,
    /// Lead time is below the minimum notice and no urgent exception applies.
    InsufficientNotice,
    /// The leave span exceeds the maximum consecutive days.
    ExceedsMaxConsecutive,
    /// The balance snapshot does not cover the requested duration.
    InsufficientBalance,
}

/// A non-blocking note attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryKind {
    /// A notice shortfall was waived for a justified urgent request.
    UrgentExceptionGranted,
    /// The leave overlaps a blackout window; approvers may ask to defer.
    DeferralAdvisory,
    /// The team would fall below minimum staffing during the leave.
    MinimumStaffingNotMet,
}

/// Marker kinds for degraded evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// The staffing oracle failed or timed out; no staffing advisory was produced.
    StaffingCheckUnavailable,
}

/// A warning generated during evaluation.
///
/// Warnings indicate that part of the evaluation was skipped or degraded
/// without affecting the validity of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionWarning {
    /// The kind of warning.
    pub kind: WarningKind,
    /// A human-readable description of the warning.
    pub message: String,
}

/// A single step in the audit trace recording a rule decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the policy clause for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The outcome of evaluating one leave request against one policy.
///
/// A decision is a plain value: the same request, rule set and staffing
/// response always produce an identical decision.
///
/// # Example
///
/// ```
/// use leave_policy_engine::models::{ApprovalRole, ApprovalStep, Decision};
///
/// let decision = Decision {
///     policy_document_id: "annual_leave_fte_cn_gz".to_string(),
///     errors: vec![],
///     approval_chain: ApprovalStep::chain(&[ApprovalRole::Manager]),
///     escalation: false,
///     advisories: vec![],
///     warnings: vec![],
///     audit_trace: vec![],
/// };
/// assert!(decision.is_valid());
/// assert_eq!(decision.approval_roles(), vec![ApprovalRole::Manager]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// The policy document the request was evaluated against.
    pub policy_document_id: String,
    /// Validation errors in the order the rules ran.
    pub errors: Vec<ValidationErrorKind>,
    /// Ordered approvers required for this request.
    pub approval_chain: Vec<ApprovalStep>,
    /// True when the exception band applies.
    pub escalation: bool,
    /// Non-blocking advisories for approvers.
    pub advisories: Vec<AdvisoryKind>,
    /// Markers for degraded parts of the evaluation.
    pub warnings: Vec<DecisionWarning>,
    /// Every rule applied, in order.
    pub audit_trace: Vec<AuditStep>,
}

impl Decision {
    /// Returns true if no validation error was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if the given validation error was recorded.
    pub fn has_error(&self, kind: ValidationErrorKind) -> bool {
        self.errors.contains(&kind)
    }

    /// Returns true if the given advisory was recorded.
    pub fn has_advisory(&self, kind: AdvisoryKind) -> bool {
        self.advisories.contains(&kind)
    }

    /// The approval chain as a plain list of roles.
    pub fn approval_roles(&self) -> Vec<ApprovalRole> {
        self.approval_chain.iter().map(|step| step.role).collect()
    }
}
