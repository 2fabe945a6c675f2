//! Configuration loading and management for the Leave Policy Engine.
//!
//! Policy documents are re-expressed as versioned YAML rule sets: band
//! thresholds and role chains as data, kept apart from the evaluation logic.
//!
//! # Example
//!
//! ```no_run
//! use leave_policy_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Loaded {} policy documents", config.catalog().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApprovalBand, ApprovalRules, BlackoutWindow, ConsecutiveDayBasis, ConsecutiveRules,
    EngineSettings, ExceptionBand, NoticeBand, NoticeRules, PolicyCatalog, PolicyRuleSet,
    PolicyScope, StaffingConfig, StaffingSettings, UnderstaffedPeriod,
};

#[cfg(test)]
pub(crate) use types::fixtures;
