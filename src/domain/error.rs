use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    DuplicateEntity(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Profile creation failed: {0}")]
    ProfileCreationFailed(String),

    #[error("Profile update failed: {0}")]
    ProfileUpdateFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => DomainError::DuplicateEntity(msg),
            RepositoryError::Unavailable(msg) => DomainError::StoreUnavailable(msg),
            other => DomainError::Repository(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
