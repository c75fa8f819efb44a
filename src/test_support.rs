//! In-memory store and service doubles shared by unit and router tests.
//!
//! [`InMemoryStore`] implements every repository port with the same session
//! semantics the coordinator relies on: writes made through a session are
//! staged, `commit` publishes them and `abort` throws them away.
//!
//! A session stages a full copy of the store and `commit` swaps that copy in
//! whole, so overlapping sessions overwrite each other's writes. Tests drive
//! one request at a time.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        credential::HashedPassword,
        profile::{Phone, Profile, ProfileKind},
        role::Role,
        user::{User, UserId, Username},
    },
    repositories::{
        profile_repository::ProfileRepository, session::SessionManager,
        transportation_task_repository::TransportationTaskRepository,
        user_repository::UserRepository,
    },
    services::{
        password_service::PasswordHasher,
        token_service::{AccessIdentity, Token, TokenService},
    },
};

#[derive(Debug, Clone)]
struct TaskRecord {
    assigned_driver: UserId,
    #[allow(dead_code)]
    completed: bool,
}

#[derive(Debug, Clone, Default)]
struct Collections {
    users: Vec<User>,
    profiles: Vec<Profile>,
    tasks: Vec<TaskRecord>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<Collections>,
    writes: AtomicUsize,
    open_sessions: AtomicUsize,
    aborted: AtomicUsize,
    fail_profile_creates: AtomicBool,
    fail_profile_updates: AtomicBool,
    fail_aborts: AtomicBool,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

pub struct InMemorySession {
    staged: Mutex<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, user: User) {
        self.shared().users.push(user);
    }

    pub fn seed_task(&self, driver: &UserId, completed: bool) {
        self.shared().tasks.push(TaskRecord {
            assigned_driver: *driver,
            completed,
        });
    }

    pub fn seed_profile(&self, profile: Profile) {
        self.shared().profiles.push(profile);
    }

    pub fn fail_profile_creates(&self) {
        self.inner.fail_profile_creates.store(true, Ordering::SeqCst);
    }

    pub fn fail_profile_updates(&self) {
        self.inner.fail_profile_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_aborts(&self) {
        self.inner.fail_aborts.store(true, Ordering::SeqCst);
    }

    pub fn users(&self) -> Vec<User> {
        self.shared().users.clone()
    }

    pub fn user_named(&self, username: &str) -> Option<User> {
        self.shared()
            .users
            .iter()
            .find(|u| u.username().as_str() == username)
            .cloned()
    }

    pub fn all_profiles(&self) -> Vec<Profile> {
        self.shared().profiles.clone()
    }

    pub fn profiles_of(&self, user_id: &UserId) -> Vec<Profile> {
        self.shared()
            .profiles
            .iter()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect()
    }

    /// Writes attempted through any path, committed or not
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    pub fn aborted(&self) -> usize {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    fn shared(&self) -> MutexGuard<'_, Collections> {
        self.inner.state.lock().unwrap()
    }

    fn with_state<R>(
        &self,
        session: Option<&InMemorySession>,
        f: impl FnOnce(&mut Collections) -> R,
    ) -> R {
        match session {
            Some(session) => f(&mut session.staged.lock().unwrap()),
            None => f(&mut self.shared()),
        }
    }

    fn write<R>(
        &self,
        session: Option<&InMemorySession>,
        f: impl FnOnce(&mut Collections) -> R,
    ) -> R {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.with_state(session, f)
    }
}

#[async_trait]
impl SessionManager for InMemoryStore {
    type Session = InMemorySession;

    async fn begin(&self) -> Result<InMemorySession, RepositoryError> {
        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(InMemorySession {
            staged: Mutex::new(self.shared().clone()),
        })
    }

    async fn commit(&self, session: InMemorySession) -> Result<(), RepositoryError> {
        *self.shared() = session.staged.into_inner().unwrap();
        self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    async fn abort(&self, _session: InMemorySession) -> Result<(), RepositoryError> {
        self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
        self.inner.aborted.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_aborts.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("abort rejected".to_string()));
        }
        Ok(())
    }
}

fn username_taken(state: &Collections, username: &Username, except: &UserId) -> bool {
    state
        .users
        .iter()
        .any(|u| u.id() != except && u.username().collates_with(username))
}

#[async_trait]
impl UserRepository<InMemorySession> for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &UserId,
        session: Option<&InMemorySession>,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.with_state(session, |s| s.users.iter().find(|u| u.id() == id).cloned()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
        session: Option<&InMemorySession>,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.with_state(session, |s| {
            s.users
                .iter()
                .find(|u| u.username().collates_with(username))
                .cloned()
        }))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users())
    }

    async fn create(&self, user: &User, session: Option<&InMemorySession>) -> Result<(), RepositoryError> {
        self.write(session, |s| {
            if username_taken(s, user.username(), user.id()) {
                return Err(RepositoryError::Duplicate("Duplicate username".to_string()));
            }
            s.users.push(user.clone());
            Ok(())
        })
    }

    async fn update(&self, user: &User, session: Option<&InMemorySession>) -> Result<(), RepositoryError> {
        self.write(session, |s| {
            if username_taken(s, user.username(), user.id()) {
                return Err(RepositoryError::Duplicate("Duplicate username".to_string()));
            }
            let existing = s
                .users
                .iter_mut()
                .find(|u| u.id() == user.id())
                .ok_or(RepositoryError::NotFound)?;
            *existing = user.clone();
            Ok(())
        })
    }

    async fn delete_by_id(
        &self,
        id: &UserId,
        session: Option<&InMemorySession>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.write(session, |s| {
            let before = s.users.len();
            s.users.retain(|u| u.id() != id);
            s.users.len() != before
        }))
    }
}

#[async_trait]
impl ProfileRepository<InMemorySession> for InMemoryStore {
    async fn find_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        session: Option<&InMemorySession>,
    ) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.with_state(session, |s| {
            s.profiles
                .iter()
                .find(|p| p.kind() == kind && p.user_id() == user_id)
                .cloned()
        }))
    }

    async fn create(&self, profile: &Profile, session: Option<&InMemorySession>) -> Result<(), RepositoryError> {
        if self.inner.fail_profile_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError("profile insert rejected".to_string()));
        }
        self.write(session, |s| {
            let owned = s
                .profiles
                .iter()
                .any(|p| p.kind() == profile.kind() && p.user_id() == profile.user_id());
            if owned && profile.kind().enforces_unique_owner() {
                return Err(RepositoryError::Duplicate(format!(
                    "{} profile already exists",
                    profile.kind()
                )));
            }
            s.profiles.push(profile.clone());
            Ok(())
        })
    }

    async fn update_phone_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        phone: &Phone,
        session: Option<&InMemorySession>,
    ) -> Result<Option<Profile>, RepositoryError> {
        if self.inner.fail_profile_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError("profile update rejected".to_string()));
        }
        Ok(self.write(session, |s| {
            s.profiles
                .iter_mut()
                .find(|p| p.kind() == kind && p.user_id() == user_id)
                .map(|p| {
                    *p = Profile::reconstruct(p.id(), p.kind(), *p.user_id(), phone.clone());
                    p.clone()
                })
        }))
    }

    async fn delete_by_id(
        &self,
        kind: ProfileKind,
        id: Uuid,
        session: Option<&InMemorySession>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.write(session, |s| {
            let before = s.profiles.len();
            s.profiles.retain(|p| !(p.kind() == kind && p.id() == id));
            s.profiles.len() != before
        }))
    }
}

#[async_trait]
impl TransportationTaskRepository<InMemorySession> for InMemoryStore {
    async fn exists_by_assigned_driver(
        &self,
        driver: &UserId,
        session: Option<&InMemorySession>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.with_state(session, |s| {
            s.tasks.iter().any(|t| &t.assigned_driver == driver)
        }))
    }
}

/// Reversible "hash" so tests can assert what was stored
#[derive(Clone)]
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        Ok(HashedPassword::new(format!("plain:{}", plain_password)))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        Ok(hashed_password.as_str() == format!("plain:{}", plain_password))
    }
}

/// Issues `token-for-<username>`; accepts `admin-token`, `manager-token`
/// and `driver-token`.
#[derive(Clone)]
pub struct StaticTokenService;

impl TokenService for StaticTokenService {
    fn generate(&self, user: &User) -> Result<Token, DomainError> {
        Ok(format!("token-for-{}", user.username()))
    }

    fn verify(&self, token: &str) -> Result<AccessIdentity, DomainError> {
        let role = match token {
            "admin-token" => Role::Admin,
            "manager-token" => Role::Manager,
            "driver-token" => Role::Driver,
            _ => return Err(DomainError::AuthenticationFailed),
        };
        Ok(AccessIdentity {
            user_id: Uuid::nil().to_string(),
            username: token.trim_end_matches("-token").to_string(),
            roles: vec![role.as_str().to_string()],
        })
    }
}
