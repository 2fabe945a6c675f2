//! HTTP API module for the Leave Policy Engine.
//!
//! This module provides the REST endpoints the hosting service calls to
//! evaluate leave requests and to inspect the loaded policies.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ENGINE_VERSION, create_router};
pub use request::{BalanceSnapshot, EmployeeContext, EvaluationRequest, LeaveDetails};
pub use response::{ApiError, EvaluationResponse, PolicySummary};
pub use state::AppState;
