//! Error types for the Leave Policy Engine.
//!
//! Validation failures of a leave request are not errors: they are collected
//! into the [`Decision`](crate::models::Decision). This module covers the
//! conditions that stop an evaluation or a configuration load, plus the
//! staffing lookup failure that the evaluator recovers from locally.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::LeaveType;

/// The main error type for the Leave Policy Engine.
///
/// # Example
///
/// ```
/// use leave_policy_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policies".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policies");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A policy document parsed but its rule set is inconsistent.
    #[error("Invalid policy '{document_id}': {message}")]
    InvalidPolicy {
        /// The document identifier of the rejected rule set.
        document_id: String,
        /// What made the rule set unusable.
        message: String,
    },

    /// No loaded rule set applies to the request.
    #[error("No policy found for group '{policy_group}' ({leave_type}) effective on {date}")]
    PolicyNotFound {
        /// The requested policy group.
        policy_group: String,
        /// The requested leave type.
        leave_type: LeaveType,
        /// The leave start date used for the effective-date lookup.
        date: NaiveDate,
    },

    /// The staffing oracle could not answer.
    #[error("Staffing check unavailable for team '{team_id}': {message}")]
    StaffingUnavailable {
        /// The team that was queried.
        team_id: String,
        /// Why the lookup failed.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
