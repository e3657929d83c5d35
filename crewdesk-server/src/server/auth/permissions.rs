use shared::AppError;
use shared::models::Role;

use super::jwt::CurrentUser;

/// A single capability an actor may hold.
///
/// Roles map to fixed capability sets; nothing is inherited between
/// roles. Notably Admin does not hold [`Capability::EditCompensation`]:
/// salary and rating stay with Supervisor, while identity and profile
/// stay with Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create, list, delete and restore team accounts
    ManageUsers,
    /// Patch another user's profile fields (name, phone, role, password)
    EditUserProfile,
    /// Patch another user's salary and rating
    EditCompensation,
    /// Create, edit, delete and assign jobs
    ManageJobs,
    /// Move jobs to any status, including Verified
    VerifyJobs,
    /// Bulk-import roster files
    ImportRoster,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "manage_users",
            Capability::EditUserProfile => "edit_user_profile",
            Capability::EditCompensation => "edit_compensation",
            Capability::ManageJobs => "manage_jobs",
            Capability::VerifyJobs => "verify_jobs",
            Capability::ImportRoster => "import_roster",
        }
    }
}

const EMPLOYEE_CAPS: &[Capability] = &[];

const SUPERVISOR_CAPS: &[Capability] = &[
    Capability::ManageJobs,
    Capability::VerifyJobs,
    Capability::EditCompensation,
];

const ADMIN_CAPS: &[Capability] = &[
    Capability::ManageUsers,
    Capability::EditUserProfile,
    Capability::ManageJobs,
    Capability::VerifyJobs,
    Capability::ImportRoster,
];

/// Capability set for a role. Pure lookup, no I/O.
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Employee => EMPLOYEE_CAPS,
        Role::Supervisor => SUPERVISOR_CAPS,
        Role::Admin => ADMIN_CAPS,
    }
}

impl CurrentUser {
    /// Does this caller hold the capability?
    pub fn can(&self, capability: Capability) -> bool {
        capabilities(self.role).contains(&capability)
    }

    /// Error with PermissionDenied unless the caller holds the capability.
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Role {} lacks {}",
                self.role,
                capability.as_str()
            )))
        }
    }

    /// Supervisor or Admin.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Supervisor | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    fn actor(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "actor".to_string(),
            role,
        }
    }

    #[test]
    fn test_employee_holds_nothing() {
        assert!(capabilities(Role::Employee).is_empty());
    }

    #[test]
    fn test_supervisor_owns_compensation_not_accounts() {
        let supervisor = actor(Role::Supervisor);
        assert!(supervisor.can(Capability::EditCompensation));
        assert!(supervisor.can(Capability::ManageJobs));
        assert!(supervisor.can(Capability::VerifyJobs));
        assert!(!supervisor.can(Capability::ManageUsers));
        assert!(!supervisor.can(Capability::EditUserProfile));
        assert!(!supervisor.can(Capability::ImportRoster));
    }

    #[test]
    fn test_admin_owns_accounts_not_compensation() {
        let admin = actor(Role::Admin);
        assert!(admin.can(Capability::ManageUsers));
        assert!(admin.can(Capability::EditUserProfile));
        assert!(admin.can(Capability::ImportRoster));
        assert!(!admin.can(Capability::EditCompensation));
    }

    #[test]
    fn test_require_maps_to_permission_denied() {
        let err = actor(Role::Employee)
            .require(Capability::ManageJobs)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_every_capability_is_held_by_someone() {
        let all = [
            Capability::ManageUsers,
            Capability::EditUserProfile,
            Capability::EditCompensation,
            Capability::ManageJobs,
            Capability::VerifyJobs,
            Capability::ImportRoster,
        ];
        for capability in all {
            let held = [Role::Employee, Role::Supervisor, Role::Admin]
                .iter()
                .any(|r| capabilities(*r).contains(&capability));
            assert!(held, "{:?} is orphaned", capability);
        }
    }

    #[test]
    fn test_staff_check() {
        assert!(!actor(Role::Employee).is_staff());
        assert!(actor(Role::Supervisor).is_staff());
        assert!(actor(Role::Admin).is_staff());
        assert!(actor(Role::Admin).is_admin());
        assert!(!actor(Role::Supervisor).is_admin());
    }
}
