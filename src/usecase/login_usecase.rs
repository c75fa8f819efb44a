use std::marker::PhantomData;

use tracing::info;

use crate::domain::{
    error::DomainError,
    models::user::{User, Username},
    repositories::user_repository::UserRepository,
    services::{password_service::PasswordHasher, token_service::TokenService},
};

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

pub struct LoginUsecase<S, U, P, T> {
    user_repository: U,
    password_hasher: P,
    token_service: T,
    _session: PhantomData<fn() -> S>,
}

impl<S, U, P, T> LoginUsecase<S, U, P, T>
where
    S: Send + Sync + 'static,
    U: UserRepository<S> + Send + Sync,
    P: PasswordHasher + Send + Sync,
    T: TokenService,
{
    pub fn new(user_repository: U, password_hasher: P, token_service: T) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
            _session: PhantomData,
        }
    }

    pub async fn login(&self, username: String, password: String) -> Result<LoginResult, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput("All fields are required".to_string()));
        }
        let username = Username::new(username)?;

        // inactive and unknown users are indistinguishable to the caller
        let user = match self.user_repository.find_by_username(&username, None).await? {
            Some(user) if user.is_active() => user,
            _ => return Err(DomainError::AuthenticationFailed),
        };

        if !self.password_hasher.verify(&password, user.password_hash())? {
            return Err(DomainError::AuthenticationFailed);
        }

        let token = self.token_service.generate(&user)?;
        info!(user = %user.id(), "user logged in");

        Ok(LoginResult { token, user })
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::{
        domain::models::{role::RoleSet, user::UserId},
        test_support::{InMemorySession, InMemoryStore, PlainPasswordHasher, StaticTokenService},
    };

    type Usecase = LoginUsecase<InMemorySession, InMemoryStore, PlainPasswordHasher, StaticTokenService>;

    #[fixture]
    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.seed_user(
            User::new(
                UserId::new(),
                Username::new("jane".to_string()).unwrap(),
                PlainPasswordHasher.hash("secret").unwrap(),
                "Jane".to_string(),
                "Doe".to_string(),
                RoleSet::parse(&["Driver"]).unwrap(),
                true,
            )
            .unwrap(),
        );
        store.seed_user(
            User::new(
                UserId::new(),
                Username::new("retired".to_string()).unwrap(),
                PlainPasswordHasher.hash("secret").unwrap(),
                "Old".to_string(),
                "Timer".to_string(),
                RoleSet::default(),
                false,
            )
            .unwrap(),
        );
        store
    }

    fn usecase(store: InMemoryStore) -> Usecase {
        LoginUsecase::new(store, PlainPasswordHasher, StaticTokenService)
    }

    #[rstest]
    #[tokio::test]
    async fn active_user_with_matching_password_gets_token(store: InMemoryStore) {
        let result = usecase(store)
            .login("jane".to_string(), "secret".to_string())
            .await
            .unwrap();
        assert_eq!(result.token, "token-for-jane");
        assert_eq!(result.user.first_name(), "Jane");
    }

    #[rstest]
    #[case("jane", "wrong")]
    #[case("nobody", "secret")]
    #[case("retired", "secret")]
    #[tokio::test]
    async fn rejected_logins(store: InMemoryStore, #[case] username: &str, #[case] password: &str) {
        let result = usecase(store)
            .login(username.to_string(), password.to_string())
            .await;
        assert!(matches!(result, Err(DomainError::AuthenticationFailed)));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_fields_are_invalid_input(store: InMemoryStore) {
        let result = usecase(store).login(String::new(), "secret".to_string()).await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }
}
