//! HTTP request handlers for the Leave Policy Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::LeaveRequest;

use super::request::EvaluationRequest;
use super::response::{ApiError, ApiErrorResponse, EvaluationResponse, PolicySummary};
use super::state::AppState;

/// Version reported in every evaluation response.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/policies", get(policies_handler))
        .with_state(state)
}

/// Handler for POST /evaluate endpoint.
///
/// Accepts an evaluation request and returns the policy decision.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<EvaluationResponse>, ApiErrorResponse> {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return Err(ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: rejection_to_error(rejection, correlation_id),
            });
        }
    };

    let leave_request: LeaveRequest = request.into();

    let start_time = Instant::now();
    match state.evaluator().evaluate(&leave_request).await {
        Ok(decision) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %leave_request.employee_id,
                document_id = %decision.policy_document_id,
                valid = decision.is_valid(),
                escalation = decision.escalation,
                duration_us = duration.as_micros(),
                "Evaluation completed successfully"
            );
            Ok(Json(EvaluationResponse {
                evaluation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: ENGINE_VERSION.to_string(),
                duration_us: duration.as_micros() as u64,
                decision,
            }))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %leave_request.employee_id,
                error = %err,
                "Evaluation failed"
            );
            Err(err.into())
        }
    }
}

/// Handler for GET /policies endpoint.
///
/// Lists the loaded policy documents, oldest effective date first.
async fn policies_handler(State(state): State<AppState>) -> Json<Vec<PolicySummary>> {
    let policies = state
        .catalog()
        .rule_sets()
        .iter()
        .map(PolicySummary::from)
        .collect();
    Json(policies)
}

/// Maps a JSON extraction failure onto an API error body.
fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyCatalog;
    use crate::config::fixtures::fte_cn_gz_rule_set;
    use crate::evaluation::PolicyEvaluator;
    use axum::body::Body;
    use axum::http::{Request, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let catalog = PolicyCatalog::new(vec![fte_cn_gz_rule_set()]).unwrap();
        create_router(AppState::new(PolicyEvaluator::new(Arc::new(catalog))))
    }

    #[tokio::test]
    async fn test_policies_lists_loaded_documents() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .uri("/policies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let policies: Vec<PolicySummary> = serde_json::from_slice(&body).unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].document_id, "annual_leave_fte_cn_gz");
    }

    #[tokio::test]
    async fn test_evaluate_unknown_group_returns_json_404() {
        let body = serde_json::json!({
            "employee": { "id": "EMP2001", "policy_group": "CONTRACTOR_US" },
            "leave": {
                "start_date": "2026-03-09",
                "end_date": "2026-03-09",
                "duration_days": "1",
                "submission_date": "2026-03-01"
            }
        });
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "POLICY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_evaluate_missing_content_type() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }
}
