use crate::domain::models::{
    profile::ProfileKind,
    role::{Role, RoleSet},
};

/// Picks the profile collection that holds the dependent record for `roles`.
///
/// Roles are tested in [`ProfileKind::PRIORITY`] order and the first match
/// wins. `None` means the role set carries no profiled role.
pub fn resolve_profile(roles: &RoleSet) -> Option<ProfileKind> {
    ProfileKind::PRIORITY
        .into_iter()
        .find(|kind| roles.contains(role_for(*kind)))
}

fn role_for(kind: ProfileKind) -> Role {
    match kind {
        ProfileKind::Manager => Role::Manager,
        ProfileKind::Driver => Role::Driver,
        ProfileKind::Analyst => Role::Analyst,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&["Manager", "Driver"], Some(ProfileKind::Manager))]
    #[case(&["Driver", "Analyst"], Some(ProfileKind::Driver))]
    #[case(&["Analyst"], Some(ProfileKind::Analyst))]
    #[case(&["Admin", "Analyst", "Manager"], Some(ProfileKind::Manager))]
    #[case(&["Employee"], None)]
    #[case(&["Admin", "Employee"], None)]
    fn resolves_by_priority(#[case] roles: &[&str], #[case] expected: Option<ProfileKind>) {
        let roles = RoleSet::parse(roles).unwrap();
        assert_eq!(resolve_profile(&roles), expected);
    }
}
