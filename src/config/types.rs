//! Configuration types for leave policy evaluation.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML policy documents, engine settings and staffing data, and the
//! [`PolicyCatalog`] that indexes loaded rule sets by scope and date.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalRole, DateRange, LeaveType};

/// Which requests a policy document applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyScope {
    /// Site/employment-type code, e.g. "FTE_CN_GZ".
    pub policy_group: String,
    /// Leave types governed by the document.
    #[serde(default = "default_leave_types")]
    pub leave_types: Vec<LeaveType>,
}

fn default_leave_types() -> Vec<LeaveType> {
    vec![LeaveType::Annual]
}

impl PolicyScope {
    /// Returns true if the scope covers the given group and leave type.
    ///
    /// Policy group codes are compared case-insensitively.
    pub fn applies_to(&self, policy_group: &str, leave_type: LeaveType) -> bool {
        self.policy_group.eq_ignore_ascii_case(policy_group.trim())
            && self.leave_types.contains(&leave_type)
    }
}

/// One row of the notice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeBand {
    /// Largest duration covered by this band (inclusive). `None` means unbounded.
    #[serde(default)]
    pub max_duration: Option<Decimal>,
    /// Minimum calendar days between submission and start.
    pub min_notice_days: i64,
}

/// Advance-notice rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRules {
    /// Reference to the policy clause for notice.
    pub clause: String,
    /// Bands ordered by ascending duration; the last one is unbounded.
    pub bands: Vec<NoticeBand>,
}

impl NoticeRules {
    /// Returns the first band whose upper bound covers `duration`.
    pub fn band_for(&self, duration: Decimal) -> Option<&NoticeBand> {
        self.bands
            .iter()
            .find(|band| band.max_duration.is_none_or(|max| duration <= max))
    }
}

/// How leave days are counted against the consecutive-days limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsecutiveDayBasis {
    /// Every calendar day in the span.
    #[default]
    Calendar,
    /// Monday to Friday days in the span.
    WorkingDays,
}

/// Maximum consecutive days rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsecutiveRules {
    /// Reference to the policy clause for the limit.
    pub clause: String,
    /// Largest number of counted days allowed in one request.
    pub max_days: i64,
    /// Counting basis.
    #[serde(default)]
    pub basis: ConsecutiveDayBasis,
}

/// One row of the approval table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalBand {
    /// Largest duration covered by this band (inclusive).
    pub max_duration: Decimal,
    /// Approvers in sign-off order.
    pub roles: Vec<ApprovalRole>,
}

/// Approvers required beyond the last standard band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionBand {
    /// Approvers in sign-off order.
    pub roles: Vec<ApprovalRole>,
}

/// Approval routing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRules {
    /// Reference to the policy clause for approvals.
    pub clause: String,
    /// Bands ordered by ascending upper bound.
    pub bands: Vec<ApprovalBand>,
    /// Chain used for exception cases.
    pub exception: ExceptionBand,
}

impl ApprovalRules {
    /// Returns the narrowest band whose upper bound covers `duration`.
    pub fn band_for(&self, duration: Decimal) -> Option<&ApprovalBand> {
        self.bands.iter().find(|band| duration <= band.max_duration)
    }
}

/// The typed form of one leave policy document.
///
/// A rule set is immutable once loaded. Use [`PolicyRuleSet::validate`] (the
/// loader and [`PolicyCatalog::new`] call it) before evaluating against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRuleSet {
    /// Stable identifier of the policy document.
    pub document_id: String,
    /// Human-readable title.
    pub title: String,
    /// Document version label.
    pub version: String,
    /// First day the document applies.
    pub effective_date: NaiveDate,
    /// Applicability predicate.
    pub scope: PolicyScope,
    /// Smallest bookable unit in days (e.g. 0.5).
    pub unit_granularity: Decimal,
    /// Advance-notice table.
    pub notice: NoticeRules,
    /// Maximum consecutive days rule.
    pub consecutive: ConsecutiveRules,
    /// Approval routing table.
    pub approval: ApprovalRules,
    /// Opaque blackout policy reference handled by the staffing oracle.
    #[serde(default)]
    pub blackout_policy: Option<String>,
}

impl PolicyRuleSet {
    /// Checks that the tables are well formed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPolicy`] describing the first problem found.
    pub fn validate(&self) -> EngineResult<()> {
        let group = &self.scope.policy_group;
        if group.trim().is_empty() {
            return Err(self.invalid("scope.policy_group must not be empty"));
        }
        if group.trim() != group {
            return Err(self.invalid("scope.policy_group must not have surrounding whitespace"));
        }
        if self.scope.leave_types.is_empty() {
            return Err(self.invalid("scope.leave_types must not be empty"));
        }
        if self.unit_granularity <= Decimal::ZERO {
            return Err(self.invalid("unit_granularity must be positive"));
        }
        self.validate_notice()?;
        if self.consecutive.max_days <= 0 {
            return Err(self.invalid("consecutive.max_days must be positive"));
        }
        self.validate_approval()
    }

    fn validate_notice(&self) -> EngineResult<()> {
        let bands = &self.notice.bands;
        let Some(last) = bands.last() else {
            return Err(self.invalid("notice.bands must not be empty"));
        };
        if last.max_duration.is_some() {
            return Err(self.invalid("the last notice band must be unbounded"));
        }
        let mut previous = Decimal::ZERO;
        for band in &bands[..bands.len() - 1] {
            let Some(max) = band.max_duration else {
                return Err(self.invalid("only the last notice band may be unbounded"));
            };
            if max <= previous {
                return Err(self.invalid("notice bands must have ascending positive bounds"));
            }
            previous = max;
        }
        if bands.iter().any(|band| band.min_notice_days < 0) {
            return Err(self.invalid("min_notice_days must not be negative"));
        }
        Ok(())
    }

    fn validate_approval(&self) -> EngineResult<()> {
        let bands = &self.approval.bands;
        if bands.is_empty() {
            return Err(self.invalid("approval.bands must not be empty"));
        }
        let mut previous_bound = Decimal::ZERO;
        let mut previous_len = 0;
        for band in bands {
            if band.max_duration <= previous_bound {
                return Err(self.invalid("approval bands must have ascending positive bounds"));
            }
            if band.roles.is_empty() {
                return Err(self.invalid("approval band roles must not be empty"));
            }
            if band.roles.len() < previous_len {
                return Err(self.invalid("approval chains must not shrink as duration grows"));
            }
            previous_bound = band.max_duration;
            previous_len = band.roles.len();
        }
        if self.approval.exception.roles.len() < previous_len.max(1) {
            return Err(self.invalid(
                "exception roles must be at least as long as the last approval band",
            ));
        }
        Ok(())
    }

    fn invalid(&self, message: &str) -> EngineError {
        EngineError::InvalidPolicy {
            document_id: self.document_id.clone(),
            message: message.to_string(),
        }
    }
}

/// All loaded rule sets, indexed for lookup by scope and date.
#[derive(Debug, Clone, Default)]
pub struct PolicyCatalog {
    /// Rule sets sorted by effective date (oldest first).
    rule_sets: Vec<PolicyRuleSet>,
}

impl PolicyCatalog {
    /// Builds a catalog, validating every rule set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPolicy`] if a rule set is malformed, a
    /// document id is repeated, or two documents share a scope and effective date.
    pub fn new(rule_sets: Vec<PolicyRuleSet>) -> EngineResult<Self> {
        let mut sorted = rule_sets;
        sorted.sort_by(|a, b| {
            a.effective_date
                .cmp(&b.effective_date)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });

        for (index, rule_set) in sorted.iter().enumerate() {
            rule_set.validate()?;
            for other in &sorted[..index] {
                if other.document_id == rule_set.document_id {
                    return Err(rule_set.invalid("duplicate document_id"));
                }
                let overlapping_types = rule_set
                    .scope
                    .leave_types
                    .iter()
                    .any(|t| other.scope.leave_types.contains(t));
                if other.effective_date == rule_set.effective_date
                    && other
                        .scope
                        .policy_group
                        .eq_ignore_ascii_case(&rule_set.scope.policy_group)
                    && overlapping_types
                {
                    return Err(rule_set.invalid(&format!(
                        "shares scope and effective date with '{}'",
                        other.document_id
                    )));
                }
            }
        }

        Ok(Self { rule_sets: sorted })
    }

    /// Selects the rule set governing a request.
    ///
    /// Among documents whose scope matches, the one with the latest effective
    /// date on or before `date` wins.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PolicyNotFound`] when no document qualifies.
    pub fn select(
        &self,
        policy_group: &str,
        leave_type: LeaveType,
        date: NaiveDate,
    ) -> EngineResult<&PolicyRuleSet> {
        self.rule_sets
            .iter()
            .rfind(|rs| rs.effective_date <= date && rs.scope.applies_to(policy_group, leave_type))
            .ok_or_else(|| EngineError::PolicyNotFound {
                policy_group: policy_group.to_string(),
                leave_type,
                date,
            })
    }

    /// Looks up a rule set by document id.
    pub fn get(&self, document_id: &str) -> Option<&PolicyRuleSet> {
        self.rule_sets.iter().find(|rs| rs.document_id == document_id)
    }

    /// Returns all rule sets, oldest first.
    pub fn rule_sets(&self) -> &[PolicyRuleSet] {
        &self.rule_sets
    }

    /// Number of loaded rule sets.
    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    /// Returns true if no rule set is loaded.
    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

/// Staffing lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingSettings {
    /// Upper bound on a staffing oracle call, in milliseconds.
    #[serde(default = "default_staffing_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_staffing_timeout_ms() -> u64 {
    500
}

impl Default for StaffingSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_staffing_timeout_ms(),
        }
    }
}

impl StaffingSettings {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Engine settings from engine.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Staffing lookup settings.
    #[serde(default)]
    pub staffing: StaffingSettings,
}

/// A company-declared period restricting leave for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    /// The affected team.
    pub team_id: String,
    /// First blacked-out day.
    pub start: NaiveDate,
    /// Last blacked-out day (inclusive).
    pub end: NaiveDate,
    /// Why the window exists (e.g. "quarter-end release freeze").
    #[serde(default)]
    pub reason: String,
}

impl BlackoutWindow {
    /// The window as a date range.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// A period during which a team is already at minimum staffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderstaffedPeriod {
    /// The affected team.
    pub team_id: String,
    /// First understaffed day.
    pub start: NaiveDate,
    /// Last understaffed day (inclusive).
    pub end: NaiveDate,
}

impl UnderstaffedPeriod {
    /// The period as a date range.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Staffing data from staffing.yaml, served by the static staffing oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingConfig {
    /// Declared blackout windows.
    #[serde(default)]
    pub blackout_windows: Vec<BlackoutWindow>,
    /// Periods at minimum staffing.
    #[serde(default)]
    pub understaffed: Vec<UnderstaffedPeriod>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Rule sets shared by unit tests across the crate.

    use super::*;
    use std::str::FromStr;

    pub(crate) fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// The Guangzhou FTE annual leave policy used throughout the tests.
    pub(crate) fn fte_cn_gz_rule_set() -> PolicyRuleSet {
        PolicyRuleSet {
            document_id: "annual_leave_fte_cn_gz".to_string(),
            title: "Annual Leave Policy - FTE Guangzhou".to_string(),
            version: "2025.1".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            scope: PolicyScope {
                policy_group: "FTE_CN_GZ".to_string(),
                leave_types: vec![LeaveType::Annual],
            },
            unit_granularity: dec("0.5"),
            notice: NoticeRules {
                clause: "3.1".to_string(),
                bands: vec![
                    NoticeBand {
                        max_duration: Some(dec("3")),
                        min_notice_days: 2,
                    },
                    NoticeBand {
                        max_duration: None,
                        min_notice_days: 7,
                    },
                ],
            },
            consecutive: ConsecutiveRules {
                clause: "3.2".to_string(),
                max_days: 10,
                basis: ConsecutiveDayBasis::Calendar,
            },
            approval: ApprovalRules {
                clause: "4.1".to_string(),
                bands: vec![
                    ApprovalBand {
                        max_duration: dec("2"),
                        roles: vec![ApprovalRole::Manager],
                    },
                    ApprovalBand {
                        max_duration: dec("5"),
                        roles: vec![ApprovalRole::Manager, ApprovalRole::SkipLevelManager],
                    },
                    ApprovalBand {
                        max_duration: dec("10"),
                        roles: vec![
                            ApprovalRole::Manager,
                            ApprovalRole::SkipLevelManager,
                            ApprovalRole::Hrbp,
                        ],
                    },
                ],
                exception: ExceptionBand {
                    roles: vec![
                        ApprovalRole::Manager,
                        ApprovalRole::SkipLevelManager,
                        ApprovalRole::Hrbp,
                        ApprovalRole::Director,
                    ],
                },
            },
            blackout_policy: Some("datatech-release-freeze".to_string()),
        }
    }
}
