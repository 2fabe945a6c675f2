//! Leave request model and related types.
//!
//! This module defines the [`LeaveRequest`] submitted for evaluation, the
//! [`LeaveType`] it draws from, and the [`DateRange`] handed to the staffing
//! oracle.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual (vacation) leave.
    #[default]
    Annual,
    /// Sick leave.
    Sick,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveType::Annual => write!(f, "annual"),
            LeaveType::Sick => write!(f, "sick"),
        }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if the two ranges share at least one day.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_policy_engine::models::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
    /// let leave = DateRange::new(d(2), d(6));
    /// assert!(leave.overlaps(&DateRange::new(d(6), d(10))));
    /// assert!(!leave.overlaps(&DateRange::new(d(7), d(10))));
    /// ```
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A leave request as collected by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Identifier of the requesting employee.
    pub employee_id: String,
    /// Site/employment-type code selecting the policy (e.g. "FTE_CN_GZ").
    pub policy_group: String,
    /// The kind of leave requested.
    #[serde(default)]
    pub leave_type: LeaveType,
    /// Team used for the blackout and minimum-staffing lookup.
    #[serde(default)]
    pub team_id: Option<String>,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Requested duration in days.
    pub duration_days: Decimal,
    /// The date the request was submitted.
    pub submission_date: NaiveDate,
    /// Whether the requester marked the request as urgent.
    #[serde(default)]
    pub urgent: bool,
    /// Free-text reason accompanying an urgent request.
    #[serde(default)]
    pub urgency_justification: Option<String>,
    /// Leave balance snapshot, when the caller has one.
    #[serde(default)]
    pub available_balance: Option<Decimal>,
}

impl LeaveRequest {
    /// Calendar days between submission and the first day of leave.
    ///
    /// The submission day itself is not counted: a request submitted on a
    /// Monday for leave starting on Thursday has 3 lead days, and a request
    /// submitted after its start date has a negative lead.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_policy_engine::models::LeaveRequest;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let request = LeaveRequest {
    ///     employee_id: "EMP1001".to_string(),
    ///     policy_group: "FTE_CN_GZ".to_string(),
    ///     leave_type: Default::default(),
    ///     team_id: None,
    ///     start_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
    ///     duration_days: Decimal::ONE,
    ///     submission_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     urgent: false,
    ///     urgency_justification: None,
    ///     available_balance: None,
    /// };
    /// assert_eq!(request.lead_days(), 3);
    /// ```
    pub fn lead_days(&self) -> i64 {
        (self.start_date - self.submission_date).num_days()
    }

    /// Number of calendar days in `[start_date, end_date]`, both ends included.
    ///
    /// Returns zero or less when the end date precedes the start date.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Number of Monday-to-Friday days in `[start_date, end_date]`.
    pub fn working_days_in_span(&self) -> i64 {
        let days = self.span_days();
        if days <= 0 {
            return 0;
        }
        let first = i64::from(self.start_date.weekday().num_days_from_monday());
        // Whole weeks contribute five days each; the leftover days start at `first`.
        let remainder = (0..days % 7).filter(|i| (first + i) % 7 < 5).count() as i64;
        (days / 7) * 5 + remainder
    }

    /// The leave period as a date range.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// True when the request is urgent and carries a non-blank justification.
    pub fn has_urgent_justification(&self) -> bool {
        self.urgent
            && self
                .urgency_justification
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}
