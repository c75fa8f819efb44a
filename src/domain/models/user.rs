use std::fmt;

use serde::{Deserialize, Serialize};
#[cfg(test)]
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    models::{credential::HashedPassword, role::RoleSet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);
impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login name, compared under a case- and accent-insensitive collation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);
impl Username {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(DomainError::InvalidInput("Username is required".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// In-process stand-in for the users table collation: decompose, drop
    /// combining marks, lowercase.
    #[cfg(test)]
    pub fn collation_key(&self) -> String {
        self.0
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>()
            .to_lowercase()
    }

    #[cfg(test)]
    pub fn collates_with(&self, other: &Username) -> bool {
        self.collation_key() == other.collation_key()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: HashedPassword,
    first_name: String,
    last_name: String,
    roles: RoleSet,
    active: bool,
}

impl User {
    pub fn new(
        id: UserId,
        username: Username,
        password_hash: HashedPassword,
        first_name: String,
        last_name: String,
        roles: RoleSet,
        active: bool,
    ) -> Result<Self, DomainError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "First and last name are required".to_string(),
            ));
        }

        Ok(Self {
            id,
            username,
            password_hash,
            first_name,
            last_name,
            roles,
            active,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn username(&self) -> &Username {
        &self.username
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rename(&mut self, username: Username) {
        self.username = username;
    }

    pub fn assign_roles(&mut self, roles: RoleSet) {
        self.roles = roles;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn change_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
    }
}
