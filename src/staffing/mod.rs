//! Staffing capability consulted for blackout and minimum-staffing advisories.
//!
//! The evaluator never talks to a calendar or roster directly. It is handed an
//! implementation of [`StaffingOracle`], so deployments can plug in a live
//! staffing service while tests and the bundled server use
//! [`StaticStaffingOracle`].

mod static_oracle;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::DateRange;

pub use static_oracle::StaticStaffingOracle;

/// What the staffing source reports for a team over a leave period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingStatus {
    /// The period overlaps a blackout window for the team.
    pub is_blackout: bool,
    /// The team stays at or above minimum staffing if the leave is taken.
    pub minimum_staffing_met: bool,
}

impl StaffingStatus {
    /// A status with no blackout and sufficient staffing.
    pub const CLEAR: StaffingStatus = StaffingStatus {
        is_blackout: false,
        minimum_staffing_met: true,
    };
}

/// Source of team staffing information.
///
/// Implementations may perform I/O. The evaluator bounds every call with a
/// timeout and treats an error as a degraded check, never as a rejection.
#[async_trait::async_trait]
pub trait StaffingOracle: Send + Sync {
    /// Reports blackout and minimum-staffing status for `team_id` over `range`.
    async fn check_staffing(&self, team_id: &str, range: DateRange)
    -> EngineResult<StaffingStatus>;
}
