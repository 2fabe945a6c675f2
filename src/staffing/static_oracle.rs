//! Staffing oracle backed by the windows declared in staffing.yaml.

use tracing::debug;

use crate::config::StaffingConfig;
use crate::error::EngineResult;
use crate::models::DateRange;

use super::{StaffingOracle, StaffingStatus};

/// Answers staffing lookups from a fixed list of blackout windows and
/// understaffed periods.
///
/// # Example
///
/// ```
/// use leave_policy_engine::config::{BlackoutWindow, StaffingConfig};
/// use leave_policy_engine::models::DateRange;
/// use leave_policy_engine::staffing::StaticStaffingOracle;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
/// let oracle = StaticStaffingOracle::new(StaffingConfig {
///     blackout_windows: vec![BlackoutWindow {
///         team_id: "datatech".to_string(),
///         start: d(23),
///         end: d(31),
///         reason: "release freeze".to_string(),
///     }],
///     understaffed: vec![],
/// });
///
/// let status = oracle.status_for("datatech", DateRange::new(d(30), d(31)));
/// assert!(status.is_blackout);
/// assert!(status.minimum_staffing_met);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticStaffingOracle {
    config: StaffingConfig,
}

impl StaticStaffingOracle {
    /// Creates an oracle serving the given staffing data.
    pub fn new(config: StaffingConfig) -> Self {
        Self { config }
    }

    /// Computes the status without going through the async interface.
    pub fn status_for(&self, team_id: &str, range: DateRange) -> StaffingStatus {
        let is_blackout = self
            .config
            .blackout_windows
            .iter()
            .any(|w| w.team_id == team_id && w.range().overlaps(&range));

        let understaffed = self
            .config
            .understaffed
            .iter()
            .any(|p| p.team_id == team_id && p.range().overlaps(&range));

        StaffingStatus {
            is_blackout,
            minimum_staffing_met: !understaffed,
        }
    }
}

#[async_trait::async_trait]
impl StaffingOracle for StaticStaffingOracle {
    async fn check_staffing(
        &self,
        team_id: &str,
        range: DateRange,
    ) -> EngineResult<StaffingStatus> {
        let status = self.status_for(team_id, range);
        debug!(
            team_id,
            start = %range.start,
            end = %range.end,
            is_blackout = status.is_blackout,
            minimum_staffing_met = status.minimum_staffing_met,
            "Static staffing lookup"
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlackoutWindow, UnderstaffedPeriod};
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(make_date(start), make_date(end))
    }

    fn create_test_oracle() -> StaticStaffingOracle {
        StaticStaffingOracle::new(StaffingConfig {
            blackout_windows: vec![BlackoutWindow {
                team_id: "datatech".to_string(),
                start: make_date("2026-03-23"),
                end: make_date("2026-04-03"),
                reason: "quarter-end release freeze".to_string(),
            }],
            understaffed: vec![UnderstaffedPeriod {
                team_id: "platform".to_string(),
                start: make_date("2026-03-09"),
                end: make_date("2026-03-13"),
            }],
        })
    }

    #[tokio::test]
    async fn test_leave_inside_blackout_window() {
        let oracle = create_test_oracle();
        let status = oracle
            .check_staffing("datatech", range("2026-03-30", "2026-03-31"))
            .await
            .unwrap();
        assert!(status.is_blackout);
        assert!(status.minimum_staffing_met);
    }

    #[tokio::test]
    async fn test_leave_touching_blackout_boundary() {
        let oracle = create_test_oracle();
        let status = oracle
            .check_staffing("datatech", range("2026-03-16", "2026-03-23"))
            .await
            .unwrap();
        assert!(status.is_blackout);
    }

    #[tokio::test]
    async fn test_other_team_not_affected_by_blackout() {
        let oracle = create_test_oracle();
        let status = oracle
            .check_staffing("finance", range("2026-03-30", "2026-03-31"))
            .await
            .unwrap();
        assert_eq!(status, StaffingStatus::CLEAR);
    }

    #[tokio::test]
    async fn test_understaffed_period_reported() {
        let oracle = create_test_oracle();
        let status = oracle
            .check_staffing("platform", range("2026-03-13", "2026-03-16"))
            .await
            .unwrap();
        assert!(!status.is_blackout);
        assert!(!status.minimum_staffing_met);
    }

    #[test]
    fn test_empty_oracle_is_always_clear() {
        let oracle = StaticStaffingOracle::default();
        assert_eq!(
            oracle.status_for("datatech", range("2026-03-30", "2026-03-31")),
            StaffingStatus::CLEAR
        );
    }
}
