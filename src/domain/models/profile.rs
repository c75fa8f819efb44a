use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{error::DomainError, models::user::UserId};

/// Role family that owns a dependent profile document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    Manager,
    Driver,
    Analyst,
}

impl ProfileKind {
    /// Resolution and probe order
    pub const PRIORITY: [ProfileKind; 3] =
        [ProfileKind::Manager, ProfileKind::Driver, ProfileKind::Analyst];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Manager => "Manager",
            ProfileKind::Driver => "Driver",
            ProfileKind::Analyst => "Analyst",
        }
    }

    /// Whether the store allows at most one profile of this kind per user.
    /// Only drivers carry a unique index on the owner reference.
    pub fn enforces_unique_owner(&self) -> bool {
        matches!(self, ProfileKind::Driver)
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone(String);
impl Phone {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(DomainError::InvalidInput("Phone number is required".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: Uuid,
    kind: ProfileKind,
    user_id: UserId,
    phone: Phone,
}

impl Profile {
    pub fn new(kind: ProfileKind, user_id: UserId, phone: Phone) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            user_id,
            phone,
        }
    }

    pub fn reconstruct(id: Uuid, kind: ProfileKind, user_id: UserId, phone: Phone) -> Self {
        Self {
            id,
            kind,
            user_id,
            phone,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
    pub fn phone(&self) -> &Phone {
        &self.phone
    }
}
