//! Application state for the Leave Policy Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use crate::config::PolicyCatalog;
use crate::evaluation::PolicyEvaluator;

/// Shared application state.
///
/// Holds the evaluator, which itself shares the policy catalog and staffing
/// oracle behind `Arc`s, so cloning the state per request is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    evaluator: PolicyEvaluator,
}

impl AppState {
    /// Creates a new application state around an evaluator.
    pub fn new(evaluator: PolicyEvaluator) -> Self {
        Self { evaluator }
    }

    /// Returns the policy evaluator.
    pub fn evaluator(&self) -> &PolicyEvaluator {
        &self.evaluator
    }

    /// Returns the loaded policy catalog.
    pub fn catalog(&self) -> &PolicyCatalog {
        self.evaluator.catalog()
    }
}
