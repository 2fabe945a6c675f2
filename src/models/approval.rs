//! Approval roles and approval chain steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A role that must sign off on a leave request.
///
/// Roles carry no behaviour at this layer; only their membership and order in
/// a chain matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRole {
    /// The requester's direct manager.
    Manager,
    /// The manager one level above the direct manager.
    SkipLevelManager,
    /// Head of the requester's department.
    DepartmentHead,
    /// HR Business Partner.
    Hrbp,
    /// Director, required for exception cases.
    Director,
}

impl fmt::Display for ApprovalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalRole::Manager => "manager",
            ApprovalRole::SkipLevelManager => "skip_level_manager",
            ApprovalRole::DepartmentHead => "department_head",
            ApprovalRole::Hrbp => "hrbp",
            ApprovalRole::Director => "director",
        };
        f.write_str(name)
    }
}

/// One required sign-off in an approval chain.
///
/// # Example
///
/// ```
/// use leave_policy_engine::models::{ApprovalRole, ApprovalStep};
///
/// let steps = ApprovalStep::chain(&[ApprovalRole::Manager, ApprovalRole::Hrbp]);
/// assert_eq!(steps[1].order, 2);
/// assert_eq!(steps[1].role, ApprovalRole::Hrbp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// 1-based position in the chain.
    pub order: u32,
    /// The role that signs off at this position.
    pub role: ApprovalRole,
}

impl ApprovalStep {
    /// Builds an ordered chain from a list of roles.
    pub fn chain(roles: &[ApprovalRole]) -> Vec<ApprovalStep> {
        roles
            .iter()
            .zip(1u32..)
            .map(|(role, order)| ApprovalStep { order, role: *role })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_orders_from_one() {
        let chain = ApprovalStep::chain(&[
            ApprovalRole::Manager,
            ApprovalRole::SkipLevelManager,
            ApprovalRole::Hrbp,
        ]);
        let orders: Vec<u32> = chain.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(chain[0].role, ApprovalRole::Manager);
    }

    #[test]
    fn test_empty_chain() {
        assert!(ApprovalStep::chain(&[]).is_empty());
    }

    #[test]
    fn test_role_serialization_matches_display() {
        for role in [
            ApprovalRole::Manager,
            ApprovalRole::SkipLevelManager,
            ApprovalRole::DepartmentHead,
            ApprovalRole::Hrbp,
            ApprovalRole::Director,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_role_deserialization_from_yaml() {
        let roles: Vec<ApprovalRole> =
            serde_yaml::from_str("[manager, skip_level_manager, hrbp]").unwrap();
        assert_eq!(
            roles,
            vec![
                ApprovalRole::Manager,
                ApprovalRole::SkipLevelManager,
                ApprovalRole::Hrbp
            ]
        );
    }
}
