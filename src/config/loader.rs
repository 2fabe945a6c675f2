//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading policy
//! documents, engine settings and staffing data from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{EngineSettings, PolicyCatalog, PolicyRuleSet, StaffingConfig};

/// Loads and provides access to leave policy configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── engine.yaml          # Engine settings (optional)
/// ├── staffing.yaml        # Blackout windows for the static oracle (optional)
/// └── policies/
///     └── annual_leave_fte_cn_gz.yaml   # One rule set per file
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_policy_engine::config::ConfigLoader;
/// use leave_policy_engine::models::LeaveType;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let policy = loader.get_rule_set("FTE_CN_GZ", LeaveType::Annual, date).unwrap();
/// println!("Policy: {}", policy.title);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    catalog: PolicyCatalog,
    settings: EngineSettings,
    staffing: Option<StaffingConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the `policies` directory is missing or holds no YAML file
    /// - any file contains invalid YAML or misses a required field
    /// - any rule set fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rule_sets = Self::load_policies(&path.join("policies"))?;
        let catalog = PolicyCatalog::new(rule_sets)?;

        let settings = Self::load_optional_yaml::<EngineSettings>(&path.join("engine.yaml"))?
            .unwrap_or_default();
        let staffing = Self::load_optional_yaml::<StaffingConfig>(&path.join("staffing.yaml"))?;

        info!(
            config_dir = %path.display(),
            policies = catalog.len(),
            staffing_data = staffing.is_some(),
            "Loaded leave policy configuration"
        );

        Ok(Self {
            catalog,
            settings,
            staffing,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file if it exists.
    fn load_optional_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<Option<T>> {
        if !path.exists() {
            debug!(path = %path.display(), "Optional configuration file absent");
            return Ok(None);
        }
        Self::load_yaml(path).map(Some)
    }

    /// Loads every policy document from the policies directory.
    fn load_policies(policies_dir: &Path) -> EngineResult<Vec<PolicyRuleSet>> {
        let policies_dir_str = policies_dir.display().to_string();

        if !policies_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: policies_dir_str,
            });
        }

        let entries = fs::read_dir(policies_dir).map_err(|_| EngineError::ConfigNotFound {
            path: policies_dir_str.clone(),
        })?;

        let mut rule_sets = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: policies_dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                let rule_set = Self::load_yaml::<PolicyRuleSet>(&path)?;
                debug!(
                    document_id = %rule_set.document_id,
                    effective_date = %rule_set.effective_date,
                    "Parsed policy document"
                );
                rule_sets.push(rule_set);
            }
        }

        if rule_sets.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no policy files found)", policies_dir_str),
            });
        }

        Ok(rule_sets)
    }

    /// Returns the loaded policy catalog.
    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the staffing data, if staffing.yaml was present.
    pub fn staffing(&self) -> Option<&StaffingConfig> {
        self.staffing.as_ref()
    }

    /// Gets the rule set governing a request on a given start date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PolicyNotFound`] when no document applies.
    pub fn get_rule_set(
        &self,
        policy_group: &str,
        leave_type: LeaveType,
        date: NaiveDate,
    ) -> EngineResult<&PolicyRuleSet> {
        self.catalog.select(policy_group, leave_type, date)
    }

    /// Consumes the loader, returning its parts.
    pub fn into_parts(self) -> (PolicyCatalog, EngineSettings, Option<StaffingConfig>) {
        (self.catalog, self.settings, self.staffing)
    }
}
