//! Leave Request Policy Evaluation Engine
//!
//! This crate turns a leave policy document into a versioned rule set and
//! evaluates leave requests against it: unit and notice validation, the
//! consecutive days limit, banded approval routing with escalation, and
//! blackout/staffing advisories from an injected staffing oracle. Every
//! evaluation returns a [`models::Decision`] with a full audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod staffing;
