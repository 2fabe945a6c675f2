//! Policy evaluation orchestration.
//!
//! [`evaluate_with_rule_set`] is the pure decision function: request, rule set
//! and staffing outcome in, [`Decision`] out. [`PolicyEvaluator`] wraps it
//! with rule set selection and the bounded staffing oracle call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{PolicyCatalog, PolicyRuleSet, StaffingSettings};
use crate::error::EngineResult;
use crate::models::{Decision, LeaveRequest};
use crate::staffing::StaffingOracle;

use super::{
    StaffingOutcome, assess_staffing, check_consecutive_days, check_leave_balance,
    resolve_approval_chain, validate_request,
};

/// Evaluates a request against a known rule set.
///
/// Rules run in a fixed order: request validation, leave balance,
/// consecutive days, approval chain, staffing advisory. Validation errors are
/// collected, never short-circuited. The same inputs always produce an
/// identical decision.
///
/// # Examples
///
/// ```no_run
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::{evaluate_with_rule_set, StaffingOutcome};
/// use leave_policy_engine::models::{ApprovalRole, LeaveRequest, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let rule_set = loader.get_rule_set("FTE_CN_GZ", LeaveType::Annual, date(5)).unwrap();
///
/// let request = LeaveRequest {
///     employee_id: "EMP1001".to_string(),
///     policy_group: "FTE_CN_GZ".to_string(),
///     leave_type: LeaveType::Annual,
///     team_id: None,
///     start_date: date(5),
///     end_date: date(5),
///     duration_days: Decimal::ONE,
///     submission_date: date(2),
///     urgent: false,
///     urgency_justification: None,
///     available_balance: None,
/// };
///
/// let outcome = StaffingOutcome::NotChecked { reason: "no team".to_string() };
/// let decision = evaluate_with_rule_set(&request, rule_set, &outcome);
/// assert!(decision.is_valid());
/// assert_eq!(decision.approval_roles(), vec![ApprovalRole::Manager]);
/// ```
pub fn evaluate_with_rule_set(
    request: &LeaveRequest,
    rule_set: &PolicyRuleSet,
    staffing: &StaffingOutcome,
) -> Decision {
    let mut step_number: u32 = 1;
    let mut audit_trace = Vec::new();

    let validation = validate_request(request, rule_set, step_number);
    step_number += validation.audit_steps.len() as u32;
    let mut errors = validation.errors;
    let mut advisories = validation.advisories;
    audit_trace.extend(validation.audit_steps);

    let balance = check_leave_balance(request, step_number);
    step_number += 1;
    errors.extend(balance.error);
    audit_trace.push(balance.audit_step);

    let consecutive = check_consecutive_days(request, rule_set, step_number);
    step_number += 1;
    errors.extend(consecutive.error);
    audit_trace.push(consecutive.audit_step);

    let approval = resolve_approval_chain(request, rule_set, consecutive.exceeds_max, step_number);
    step_number += 1;
    audit_trace.push(approval.audit_step);

    let assessment = assess_staffing(request, rule_set, staffing, step_number);
    advisories.extend(assessment.advisories);
    audit_trace.push(assessment.audit_step);

    Decision {
        policy_document_id: rule_set.document_id.clone(),
        errors,
        approval_chain: approval.chain,
        escalation: approval.escalation,
        advisories,
        warnings: assessment.warnings,
        audit_trace,
    }
}

/// Evaluates leave requests against a policy catalog.
///
/// Cheap to clone: the catalog and oracle are shared behind [`Arc`]s, and an
/// evaluation holds no mutable state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::evaluation::PolicyEvaluator;
/// use leave_policy_engine::staffing::StaticStaffingOracle;
///
/// let (catalog, settings, staffing) = ConfigLoader::load("./config").unwrap().into_parts();
/// let evaluator = PolicyEvaluator::new(Arc::new(catalog))
///     .with_staffing_oracle(Arc::new(StaticStaffingOracle::new(staffing.unwrap_or_default())))
///     .with_staffing_settings(&settings.staffing);
/// ```
#[derive(Clone)]
pub struct PolicyEvaluator {
    catalog: Arc<PolicyCatalog>,
    oracle: Option<Arc<dyn StaffingOracle>>,
    staffing_timeout: Duration,
}

impl PolicyEvaluator {
    /// Creates an evaluator with no staffing oracle.
    pub fn new(catalog: Arc<PolicyCatalog>) -> Self {
        Self {
            catalog,
            oracle: None,
            staffing_timeout: StaffingSettings::default().timeout(),
        }
    }

    /// Attaches the staffing oracle consulted for blackout advisories.
    pub fn with_staffing_oracle(mut self, oracle: Arc<dyn StaffingOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Applies the staffing lookup settings.
    pub fn with_staffing_settings(mut self, settings: &StaffingSettings) -> Self {
        self.staffing_timeout = settings.timeout();
        self
    }

    /// Overrides the staffing lookup timeout.
    pub fn with_staffing_timeout(mut self, timeout: Duration) -> Self {
        self.staffing_timeout = timeout;
        self
    }

    /// Returns the policy catalog.
    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    /// Evaluates a leave request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::PolicyNotFound`] when no rule set
    /// matches the request's policy group and leave type on its start date.
    /// Every other problem is reported inside the returned [`Decision`].
    pub async fn evaluate(&self, request: &LeaveRequest) -> EngineResult<Decision> {
        let rule_set = self.catalog.select(
            &request.policy_group,
            request.leave_type,
            request.start_date,
        )?;

        debug!(
            employee_id = %request.employee_id,
            document_id = %rule_set.document_id,
            "Selected policy rule set"
        );

        let staffing = self.query_staffing(request).await;
        let decision = evaluate_with_rule_set(request, rule_set, &staffing);

        info!(
            employee_id = %request.employee_id,
            document_id = %decision.policy_document_id,
            errors = decision.errors.len(),
            chain_length = decision.approval_chain.len(),
            escalation = decision.escalation,
            warnings = decision.warnings.len(),
            "Leave request evaluated"
        );

        Ok(decision)
    }

    /// Consults the staffing oracle, bounded by the configured timeout.
    async fn query_staffing(&self, request: &LeaveRequest) -> StaffingOutcome {
        let Some(oracle) = &self.oracle else {
            return StaffingOutcome::NotChecked {
                reason: "no staffing oracle configured".to_string(),
            };
        };
        let Some(team_id) = request.team_id.as_deref() else {
            return StaffingOutcome::NotChecked {
                reason: "request names no team".to_string(),
            };
        };
        if request.end_date < request.start_date {
            return StaffingOutcome::NotChecked {
                reason: "leave period is not a valid date range".to_string(),
            };
        }

        let start_time = Instant::now();
        let lookup = oracle.check_staffing(team_id, request.date_range());

        match tokio::time::timeout(self.staffing_timeout, lookup).await {
            Ok(Ok(status)) => {
                debug!(
                    team_id,
                    is_blackout = status.is_blackout,
                    minimum_staffing_met = status.minimum_staffing_met,
                    duration_us = start_time.elapsed().as_micros(),
                    "Staffing check completed"
                );
                StaffingOutcome::Checked(status)
            }
            Ok(Err(err)) => {
                warn!(team_id, error = %err, "Staffing check failed");
                StaffingOutcome::Unavailable {
                    message: err.to_string(),
                }
            }
            Err(_) => {
                let message = format!(
                    "Staffing check for team '{}' timed out after {}ms",
                    team_id,
                    self.staffing_timeout.as_millis()
                );
                warn!(
                    team_id,
                    timeout_ms = self.staffing_timeout.as_millis() as u64,
                    "Staffing check timed out"
                );
                StaffingOutcome::Unavailable { message }
            }
        }
    }
}

impl std::fmt::Debug for PolicyEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEvaluator")
            .field("policies", &self.catalog.len())
            .field("staffing_oracle", &self.oracle.is_some())
            .field("staffing_timeout", &self.staffing_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::{dec, fte_cn_gz_rule_set};
    use crate::error::EngineError;
    use crate::models::{
        AdvisoryKind, ApprovalRole, DateRange, LeaveType, ValidationErrorKind, WarningKind,
    };
    use crate::staffing::StaffingStatus;
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_request(duration: &str, start: &str, end: &str, submitted: &str) -> LeaveRequest {
        LeaveRequest {
            employee_id: "EMP1001".to_string(),
            policy_group: "FTE_CN_GZ".to_string(),
            leave_type: LeaveType::Annual,
            team_id: Some("datatech".to_string()),
            start_date: make_date(start),
            end_date: make_date(end),
            duration_days: dec(duration),
            submission_date: make_date(submitted),
            urgent: false,
            urgency_justification: None,
            available_balance: None,
        }
    }

    fn not_checked() -> StaffingOutcome {
        StaffingOutcome::NotChecked {
            reason: "test".to_string(),
        }
    }

    fn catalog() -> Arc<PolicyCatalog> {
        Arc::new(PolicyCatalog::new(vec![fte_cn_gz_rule_set()]).unwrap())
    }

    /// Oracle returning a fixed status.
    struct FixedOracle(StaffingStatus);

    #[async_trait::async_trait]
    impl StaffingOracle for FixedOracle {
        async fn check_staffing(
            &self,
            _team_id: &str,
            _range: DateRange,
        ) -> EngineResult<StaffingStatus> {
            Ok(self.0)
        }
    }

    /// Oracle that always fails.
    struct FailingOracle;

    #[async_trait::async_trait]
    impl StaffingOracle for FailingOracle {
        async fn check_staffing(
            &self,
            team_id: &str,
            _range: DateRange,
        ) -> EngineResult<StaffingStatus> {
            Err(EngineError::StaffingUnavailable {
                team_id: team_id.to_string(),
                message: "roster service returned 503".to_string(),
            })
        }
    }

    /// Oracle that never answers in time.
    struct SlowOracle;

    #[async_trait::async_trait]
    impl StaffingOracle for SlowOracle {
        async fn check_staffing(
            &self,
            _team_id: &str,
            _range: DateRange,
        ) -> EngineResult<StaffingStatus> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(StaffingStatus::CLEAR)
        }
    }

    // ==========================================================================
    // Pure evaluation
    // ==========================================================================

    #[test]
    fn test_one_day_with_three_days_notice() {
        let request = create_request("1", "2026-03-05", "2026-03-05", "2026-03-02");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert!(decision.errors.is_empty());
        assert_eq!(decision.approval_roles(), vec![ApprovalRole::Manager]);
        assert!(!decision.escalation);
        assert_eq!(decision.policy_document_id, "annual_leave_fte_cn_gz");
    }

    #[test]
    fn test_six_days_with_eight_days_notice() {
        let request = create_request("6", "2026-03-09", "2026-03-16", "2026-03-01");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert!(decision.is_valid());
        assert_eq!(
            decision.approval_roles(),
            vec![
                ApprovalRole::Manager,
                ApprovalRole::SkipLevelManager,
                ApprovalRole::Hrbp
            ]
        );
        assert!(!decision.escalation);
    }

    #[test]
    fn test_eleven_days_escalates_regardless_of_notice() {
        let request = create_request("11", "2026-03-09", "2026-03-23", "2026-03-08");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert!(decision.escalation);
        assert!(decision.approval_roles().contains(&ApprovalRole::Director));
        assert!(decision.has_error(ValidationErrorKind::InsufficientNotice));
        assert!(decision.has_error(ValidationErrorKind::ExceedsMaxConsecutive));
    }

    #[test]
    fn test_long_span_escalates_short_duration() {
        // 3 days booked across an 11 calendar day span
        let request = create_request("3", "2026-03-09", "2026-03-19", "2026-03-01");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert!(decision.escalation);
        assert_eq!(decision.approval_chain.len(), 4);
        assert_eq!(decision.errors, vec![ValidationErrorKind::ExceedsMaxConsecutive]);
    }

    #[test]
    fn test_invalid_unit_still_resolves_chain() {
        let request = create_request("0.3", "2026-03-09", "2026-03-09", "2026-03-01");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert_eq!(decision.errors, vec![ValidationErrorKind::InvalidUnit]);
        assert_eq!(decision.approval_roles(), vec![ApprovalRole::Manager]);
    }

    #[test]
    fn test_urgent_exception_recorded_as_advisory() {
        let mut request = create_request("4", "2026-03-09", "2026-03-12", "2026-03-08");
        request.urgent = true;
        request.urgency_justification = Some("Parent hospitalised".to_string());
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert!(!decision.has_error(ValidationErrorKind::InsufficientNotice));
        assert!(decision.has_advisory(AdvisoryKind::UrgentExceptionGranted));
    }

    #[test]
    fn test_insufficient_balance_collected_with_other_errors() {
        let mut request = create_request("4", "2026-03-09", "2026-03-12", "2026-03-08");
        request.available_balance = Some(dec("2"));
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        assert_eq!(
            decision.errors,
            vec![
                ValidationErrorKind::InsufficientNotice,
                ValidationErrorKind::InsufficientBalance
            ]
        );
    }

    #[test]
    fn test_blackout_adds_advisory_not_error() {
        let request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        let outcome = StaffingOutcome::Checked(StaffingStatus {
            is_blackout: true,
            minimum_staffing_met: true,
        });
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &outcome);

        assert!(decision.is_valid());
        assert_eq!(decision.advisories, vec![AdvisoryKind::DeferralAdvisory]);
    }

    #[test]
    fn test_audit_trace_covers_every_rule_in_order() {
        let request = create_request("1", "2026-03-05", "2026-03-05", "2026-03-02");
        let decision = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &not_checked());

        let rule_ids: Vec<&str> = decision
            .audit_trace
            .iter()
            .map(|step| step.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "duration_validation",
                "date_range_validation",
                "advance_notice",
                "leave_balance",
                "max_consecutive_days",
                "approval_chain",
                "staffing_advisory"
            ]
        );
        let numbers: Vec<u32> = decision.audit_trace.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, (1..=7).collect::<Vec<u32>>());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let request = create_request("6", "2026-03-09", "2026-03-16", "2026-03-01");
        let outcome = StaffingOutcome::Checked(StaffingStatus::CLEAR);
        let first = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &outcome);
        let second = evaluate_with_rule_set(&request, &fte_cn_gz_rule_set(), &outcome);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    // ==========================================================================
    // PolicyEvaluator
    // ==========================================================================

    #[tokio::test]
    async fn test_evaluator_without_oracle_skips_staffing() {
        let evaluator = PolicyEvaluator::new(catalog());
        let request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        let decision = evaluator.evaluate(&request).await.unwrap();

        assert!(decision.advisories.is_empty());
        assert!(decision.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_evaluator_policy_not_found_is_fatal() {
        let evaluator = PolicyEvaluator::new(catalog());
        let mut request = create_request("1", "2026-03-05", "2026-03-05", "2026-03-02");
        request.policy_group = "CONTRACTOR_US".to_string();

        let result = evaluator.evaluate(&request).await;
        assert!(matches!(result, Err(EngineError::PolicyNotFound { .. })));
    }

    #[tokio::test]
    async fn test_evaluator_selects_by_start_date() {
        let evaluator = PolicyEvaluator::new(catalog());
        let request = create_request("1", "2024-12-31", "2024-12-31", "2024-12-01");

        let result = evaluator.evaluate(&request).await;
        assert!(matches!(result, Err(EngineError::PolicyNotFound { .. })));
    }

    #[tokio::test]
    async fn test_evaluator_blackout_from_oracle() {
        let evaluator = PolicyEvaluator::new(catalog()).with_staffing_oracle(Arc::new(
            FixedOracle(StaffingStatus {
                is_blackout: true,
                minimum_staffing_met: false,
            }),
        ));
        let request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        let decision = evaluator.evaluate(&request).await.unwrap();

        assert!(decision.is_valid());
        assert!(decision.has_advisory(AdvisoryKind::DeferralAdvisory));
        assert!(decision.has_advisory(AdvisoryKind::MinimumStaffingNotMet));
    }

    #[tokio::test]
    async fn test_evaluator_request_without_team_skips_oracle() {
        let evaluator = PolicyEvaluator::new(catalog()).with_staffing_oracle(Arc::new(FailingOracle));
        let mut request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        request.team_id = None;
        let decision = evaluator.evaluate(&request).await.unwrap();

        assert!(decision.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_evaluator_oracle_failure_becomes_warning() {
        let evaluator = PolicyEvaluator::new(catalog()).with_staffing_oracle(Arc::new(FailingOracle));
        let request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        let decision = evaluator.evaluate(&request).await.unwrap();

        assert!(decision.is_valid());
        assert!(decision.advisories.is_empty());
        assert_eq!(decision.warnings.len(), 1);
        assert_eq!(decision.warnings[0].kind, WarningKind::StaffingCheckUnavailable);
        assert!(decision.warnings[0].message.contains("503"));
    }

    #[tokio::test]
    async fn test_evaluator_oracle_timeout_becomes_warning() {
        let evaluator = PolicyEvaluator::new(catalog())
            .with_staffing_oracle(Arc::new(SlowOracle))
            .with_staffing_timeout(Duration::from_millis(50));
        let request = create_request("2", "2026-03-30", "2026-03-31", "2026-03-01");
        let decision = evaluator.evaluate(&request).await.unwrap();

        assert_eq!(decision.warnings.len(), 1);
        assert!(decision.warnings[0].message.contains("timed out after 50ms"));
        assert_eq!(decision.approval_roles(), vec![ApprovalRole::Manager]);
    }

    #[test]
    fn test_evaluator_is_clone_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<PolicyEvaluator>();
    }
}
