//! Core data models for the Leave Policy Engine.
//!
//! This module contains the request, approval and decision types used
//! throughout the engine.

mod approval;
mod decision;
mod leave_request;

pub use approval::{ApprovalRole, ApprovalStep};
pub use decision::{
    AdvisoryKind, AuditStep, Decision, DecisionWarning, ValidationErrorKind, WarningKind,
};
pub use leave_request::{DateRange, LeaveRequest, LeaveType};
