use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::{
            profile::{Phone, Profile, ProfileKind},
            role::RoleSet,
            user::{User, UserId, Username},
        },
        repositories::{
            profile_repository::ProfileRepository, session::SessionManager,
            transportation_task_repository::TransportationTaskRepository,
            user_repository::UserRepository,
        },
        services::{password_service::PasswordHasher, profile_resolver::resolve_profile},
    },
    usecase::referential_guard::ReferentialGuard,
};

#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub id: Option<String>,
    pub username: Option<String>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct CreatedUser {
    pub username: Username,
    pub profile: ProfileKind,
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated {
        username: Username,
        profile: Option<ProfileKind>,
    },
    NoChange,
}

#[derive(Debug)]
pub struct DeletedUser {
    pub username: Username,
}

/// Creates, updates and deletes a user together with its role profile.
///
/// Every store write happens inside one session. A session opened here is
/// committed on success and aborted on every error path before the error is
/// returned.
pub struct UserAccountUsecase<M, U, P, T, H> {
    session_manager: M,
    user_repository: U,
    profile_repository: P,
    referential_guard: ReferentialGuard<T>,
    password_hasher: H,
}

impl<M, U, P, T, H> UserAccountUsecase<M, U, P, T, H>
where
    M: SessionManager + Send + Sync,
    U: UserRepository<M::Session> + Send + Sync,
    P: ProfileRepository<M::Session> + Send + Sync,
    T: TransportationTaskRepository<M::Session> + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    pub fn new(
        session_manager: M,
        user_repository: U,
        profile_repository: P,
        task_repository: T,
        password_hasher: H,
    ) -> Self {
        Self {
            session_manager,
            user_repository,
            profile_repository,
            referential_guard: ReferentialGuard::new(task_repository),
            password_hasher,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.user_repository.list().await?;
        if users.is_empty() {
            return Err(DomainError::NotFound("No users found".to_string()));
        }
        Ok(users)
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<CreatedUser, DomainError> {
        let (Some(username), Some(password), Some(first_name), Some(last_name), Some(roles)) = (
            non_blank(input.username),
            input.password.filter(|p| !p.is_empty()),
            non_blank(input.first_name),
            non_blank(input.last_name),
            input.roles,
        ) else {
            return Err(DomainError::InvalidInput(
                "Please fill out the required fields".to_string(),
            ));
        };
        let username = Username::new(username)?;
        let roles = RoleSet::parse(&roles)?;
        let phone = match non_blank(input.phone) {
            Some(phone) => Some(Phone::new(phone)?),
            None if resolve_profile(&roles).is_some() => {
                return Err(DomainError::InvalidInput(
                    "Phone number is required to create this user".to_string(),
                ));
            }
            None => None,
        };

        // fast path only; the unique index on username is the authority
        if self
            .user_repository
            .find_by_username(&username, None)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateEntity("Duplicate username".to_string()));
        }

        let password_hash = self.password_hasher.hash(&password)?;
        let user = User::new(
            UserId::new(),
            username,
            password_hash,
            first_name,
            last_name,
            roles,
            true,
        )?;

        let session = self.session_manager.begin().await?;
        debug!(user = %user.id(), "session opened for user creation");
        let result = self.create_in_session(&user, phone, &session).await;
        let profile = self.finish(session, result).await?;

        info!(user = %user.id(), username = %user.username(), profile = %profile, "user created");
        Ok(CreatedUser {
            username: user.username().clone(),
            profile,
        })
    }

    async fn create_in_session(
        &self,
        user: &User,
        phone: Option<Phone>,
        session: &M::Session,
    ) -> Result<ProfileKind, DomainError> {
        self.user_repository
            .create(user, Some(session))
            .await
            .map_err(username_conflict)?;

        let attempt = match (resolve_profile(user.roles()), phone) {
            (Some(kind), Some(phone)) => {
                let profile = Profile::new(kind, *user.id(), phone);
                match self.profile_repository.create(&profile, Some(session)).await {
                    Ok(()) => Ok(kind),
                    Err(e) => {
                        error!(user = %user.id(), profile = %kind, error = %e, "profile insert failed");
                        Err(format!("Failed to create {} profile", kind))
                    }
                }
            }
            (Some(kind), None) => Err(format!("Phone number is required for a {} profile", kind)),
            (None, _) => Err("Role set does not map to a manager, driver or analyst profile".to_string()),
        };

        match attempt {
            Ok(kind) => Ok(kind),
            Err(reason) => {
                warn!(user = %user.id(), %reason, "profile creation failed, removing user");
                if let Err(e) = self.user_repository.delete_by_id(user.id(), Some(session)).await {
                    error!(user = %user.id(), error = %e, "compensating user delete failed");
                }
                Err(DomainError::ProfileCreationFailed(reason))
            }
        }
    }

    pub async fn update_user(&self, input: UpdateUserInput) -> Result<UpdateOutcome, DomainError> {
        let (Some(id), Some(username), Some(roles), Some(active), Some(phone)) = (
            non_blank(input.id),
            non_blank(input.username),
            input.roles.filter(|roles| !roles.is_empty()),
            input.active,
            non_blank(input.phone),
        ) else {
            return Err(DomainError::InvalidInput(
                "All fields except password are required".to_string(),
            ));
        };
        let id = parse_user_id(&id)?;
        let username = Username::new(username)?;
        let roles = RoleSet::parse(&roles)?;
        let phone = Phone::new(phone)?;
        let password = input.password.filter(|p| !p.is_empty());

        let mut user = self
            .user_repository
            .find_by_id(&id, None)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        if let Some(holder) = self.user_repository.find_by_username(&username, None).await? {
            if holder.id() != user.id() {
                return Err(DomainError::DuplicateEntity("Duplicate username".to_string()));
            }
        }

        let target = resolve_profile(&roles);
        let current_phone = match target {
            Some(kind) => self
                .profile_repository
                .find_by_user(kind, &id, None)
                .await?
                .map(|profile| profile.phone().clone()),
            None => None,
        };

        let changed = user.username() != &username
            || user.roles() != &roles
            || user.is_active() != active
            || (target.is_some() && current_phone.as_ref() != Some(&phone));

        if !changed && password.is_none() {
            info!(user = %id, "nothing new to update");
            return Ok(UpdateOutcome::NoChange);
        }

        let previous = resolve_profile(user.roles());
        if previous.is_some() && previous != target {
            // the old profile document is left in place
            warn!(user = %id, from = ?previous, to = ?target, "role change leaves previous profile behind");
        }

        user.rename(username);
        user.assign_roles(roles);
        user.set_active(active);
        if let Some(password) = password {
            user.change_password(self.password_hasher.hash(&password)?);
        }

        let session = self.session_manager.begin().await?;
        debug!(user = %id, "session opened for user update");
        let result = self.update_in_session(&user, target, &phone, &session).await;
        self.finish(session, result).await?;

        info!(user = %id, username = %user.username(), profile = ?target, "user updated");
        Ok(UpdateOutcome::Updated {
            username: user.username().clone(),
            profile: target,
        })
    }

    async fn update_in_session(
        &self,
        user: &User,
        target: Option<ProfileKind>,
        phone: &Phone,
        session: &M::Session,
    ) -> Result<(), DomainError> {
        self.user_repository
            .update(user, Some(session))
            .await
            .map_err(username_conflict)?;

        let Some(kind) = target else {
            return Ok(());
        };

        match self
            .profile_repository
            .update_phone_by_user(kind, user.id(), phone, Some(session))
            .await
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(DomainError::ProfileUpdateFailed(format!(
                "Failed to update {} phone number",
                kind
            ))),
            Err(e) => {
                error!(user = %user.id(), profile = %kind, error = %e, "profile phone update failed");
                Err(DomainError::ProfileUpdateFailed(format!(
                    "Failed to update {} phone number",
                    kind
                )))
            }
        }
    }

    pub async fn delete_user(&self, id: Option<String>) -> Result<DeletedUser, DomainError> {
        let id = non_blank(id)
            .ok_or_else(|| DomainError::InvalidInput("User ID required".to_string()))?;
        let id = parse_user_id(&id)?;

        let session = self.session_manager.begin().await?;
        debug!(user = %id, "session opened for user deletion");
        let result = self.delete_in_session(&id, &session).await;
        let deleted = self.finish(session, result).await?;

        info!(user = %id, username = %deleted.username, "user deleted");
        Ok(deleted)
    }

    async fn delete_in_session(
        &self,
        id: &UserId,
        session: &M::Session,
    ) -> Result<DeletedUser, DomainError> {
        let user = self
            .user_repository
            .find_by_id(id, Some(session))
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        let mut profiles = Vec::new();
        for kind in ProfileKind::PRIORITY {
            if let Some(profile) = self
                .profile_repository
                .find_by_user(kind, id, Some(session))
                .await?
            {
                profiles.push(profile);
            }
        }

        if profiles.iter().any(|p| p.kind() == ProfileKind::Driver)
            && self
                .referential_guard
                .has_blocking_references(id, session)
                .await?
        {
            return Err(DomainError::Conflict(
                "Cannot delete: Driver has an assigned transportation task".to_string(),
            ));
        }

        for profile in &profiles {
            self.profile_repository
                .delete_by_id(profile.kind(), profile.id(), Some(session))
                .await?;
        }
        self.user_repository.delete_by_id(id, Some(session)).await?;

        Ok(DeletedUser {
            username: user.username().clone(),
        })
    }

    /// Commits on success, aborts otherwise. An abort failure is logged and
    /// the original error is returned.
    async fn finish<R>(
        &self,
        session: M::Session,
        result: Result<R, DomainError>,
    ) -> Result<R, DomainError> {
        match result {
            Ok(value) => {
                self.session_manager.commit(session).await?;
                debug!("session committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = self.session_manager.abort(session).await {
                    error!(error = %abort_err, "session abort failed");
                } else {
                    debug!(error = %err, "session aborted");
                }
                Err(err)
            }
        }
    }
}

/// A unique violation on the users table can only be the username index.
fn username_conflict(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::Duplicate(_) => DomainError::DuplicateEntity("Duplicate username".to_string()),
        other => other.into(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_user_id(raw: &str) -> Result<UserId, DomainError> {
    Uuid::parse_str(raw.trim())
        .map(UserId::from_uuid)
        .map_err(|_| DomainError::InvalidInput(format!("Invalid user ID '{}'", raw)))
}
