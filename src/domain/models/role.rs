use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Driver,
    Analyst,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Driver => "Driver",
            Role::Analyst => "Analyst",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Employee" => Ok(Role::Employee),
            "Manager" => Ok(Role::Manager),
            "Driver" => Ok(Role::Driver),
            "Analyst" => Ok(Role::Analyst),
            "Admin" => Ok(Role::Admin),
            other => Err(DomainError::InvalidInput(format!("Unknown role '{}'", other))),
        }
    }
}

/// Non-empty, unordered set of roles held by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new<I: IntoIterator<Item = Role>>(roles: I) -> Result<Self, DomainError> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(DomainError::InvalidInput("At least one role is required".to_string()));
        }
        Ok(Self(roles))
    }

    /// Parse role names as received from a client
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        let roles = names
            .iter()
            .map(|name| name.as_ref().parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(roles)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|role| role.as_str().to_string()).collect()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self(BTreeSet::from([Role::Employee]))
    }
}
