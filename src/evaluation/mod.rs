//! Evaluation logic for the Leave Policy Engine.
//!
//! This module contains the individual policy rules (request validation,
//! leave balance, consecutive days, approval chain resolution and the
//! staffing advisory) and the orchestrator that runs them in order and
//! assembles a [`crate::models::Decision`].

mod approval_chain;
mod consecutive_days;
mod leave_balance;
mod orchestrator;
mod request_validator;
mod staffing_advisory;

pub use approval_chain::{ApprovalChainResolution, resolve_approval_chain};
pub use consecutive_days::{ConsecutiveDaysCheck, check_consecutive_days};
pub use leave_balance::{LeaveBalanceCheck, check_leave_balance};
pub use orchestrator::{PolicyEvaluator, evaluate_with_rule_set};
pub use request_validator::{RequestValidation, validate_request};
pub use staffing_advisory::{StaffingAssessment, StaffingOutcome, assess_staffing};
