use crate::domain::{
    error::DomainError,
    models::{role::Role, user::User},
};

pub type Token = String;

/// Identity carried by a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessIdentity {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl AccessIdentity {
    pub fn has_any_role(&self, wanted: &[Role]) -> bool {
        self.roles
            .iter()
            .filter_map(|name| name.parse::<Role>().ok())
            .any(|role| wanted.contains(&role))
    }
}

impl From<&User> for AccessIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            roles: user.roles().names(),
        }
    }
}

pub trait TokenService: Send + Sync {
    fn generate(&self, user: &User) -> Result<Token, DomainError>;

    fn verify(&self, token: &str) -> Result<AccessIdentity, DomainError>;
}
