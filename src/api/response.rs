//! Response types for the Leave Policy Engine API.
//!
//! This module defines the success envelope for `/evaluate`, the policy
//! listing for `/policies`, and the error response structures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PolicyRuleSet;
use crate::error::EngineError;
use crate::models::{Decision, LeaveType};

/// Response body for a successful `/evaluate` call.
///
/// The [`Decision`] itself is deterministic; the envelope carries the
/// per-call metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Unique identifier for this evaluation.
    pub evaluation_id: Uuid,
    /// When the evaluation completed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the decision.
    pub engine_version: String,
    /// Evaluation time in microseconds.
    pub duration_us: u64,
    /// The policy decision.
    pub decision: Decision,
}

/// Summary of a loaded policy document, returned by `/policies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySummary {
    /// Stable document identifier.
    pub document_id: String,
    /// Human-readable title.
    pub title: String,
    /// Document version label.
    pub version: String,
    /// First day the document applies.
    pub effective_date: NaiveDate,
    /// Policy group the document covers.
    pub policy_group: String,
    /// Leave types the document covers.
    pub leave_types: Vec<LeaveType>,
}

impl From<&PolicyRuleSet> for PolicySummary {
    fn from(rule_set: &PolicyRuleSet) -> Self {
        Self {
            document_id: rule_set.document_id.clone(),
            title: rule_set.title.clone(),
            version: rule_set.version.clone(),
            effective_date: rule_set.effective_date,
            policy_group: rule_set.scope.policy_group.clone(),
            leave_types: rule_set.scope.leave_types.clone(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::PolicyNotFound {
                policy_group,
                leave_type,
                ..
            } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "POLICY_NOT_FOUND",
                    message,
                    format!(
                        "No loaded policy covers {} leave for group '{}' on the requested start date",
                        leave_type, policy_group
                    ),
                ),
            },
            // Staffing failures are recovered as a decision warning by the evaluator.
            EngineError::StaffingUnavailable { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidPolicy { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
        }
    }
}
