use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    domain::{
        models::user::User,
        repositories::{
            profile_repository::ProfileRepository, session::SessionManager,
            transportation_task_repository::TransportationTaskRepository,
            user_repository::UserRepository,
        },
        services::password_service::PasswordHasher,
    },
    presentation::{error::ApiError, middleware::AdminOrManager},
    usecase::user_account_usecase::{
        CreateUserInput, UpdateOutcome, UpdateUserInput, UserAccountUsecase,
    },
};

// Request

/// json for create request
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub phone: Option<String>,
}

/// json for update request
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: Option<String>,
    pub username: Option<String>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// json for delete request
#[derive(Default, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub id: Option<String>,
}

// Response

/// user as listed; never carries the password
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            roles: user.roles().names(),
            active: user.is_active(),
        }
    }
}

/* Router Function and Handler Function */

type SharedAccounts<M, U, P, T, H> = Arc<UserAccountUsecase<M, U, P, T, H>>;

/// function return Router object
/// Suppose to be nested under "/users" behind the bearer middleware
pub fn create_user_router<M, U, P, T, H>(accounts: UserAccountUsecase<M, U, P, T, H>) -> Router
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_users::<M, U, P, T, H>)
                .post(create_user::<M, U, P, T, H>)
                .patch(update_user::<M, U, P, T, H>)
                .delete(delete_user::<M, U, P, T, H>),
        )
        .with_state(Arc::new(accounts))
}

// handler function

async fn list_users<M, U, P, T, H>(State(accounts): State<SharedAccounts<M, U, P, T, H>>) -> Response
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
{
    match accounts.list_users().await {
        Ok(users) => {
            let users: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn create_user<M, U, P, T, H>(
    State(accounts): State<SharedAccounts<M, U, P, T, H>>,
    AdminOrManager(caller): AdminOrManager,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!(caller = %caller.username, "create user requested");

    let input = CreateUserInput {
        username: payload.username,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        roles: payload.roles,
        phone: payload.phone,
    };

    match accounts.create_user(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "message": format!("New user '{}' created", created.username) })),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn update_user<M, U, P, T, H>(
    State(accounts): State<SharedAccounts<M, U, P, T, H>>,
    AdminOrManager(caller): AdminOrManager,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Response
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!(caller = %caller.username, "update user requested");

    let input = UpdateUserInput {
        id: payload.id,
        username: payload.username,
        roles: payload.roles,
        active: payload.active,
        password: payload.password,
        phone: payload.phone,
    };

    match accounts.update_user(input).await {
        Ok(UpdateOutcome::Updated { username, profile }) => {
            let message = match profile {
                Some(kind) => format!("{} and {} phone number updated", username, kind),
                None => format!("{} updated", username),
            };
            (StatusCode::OK, Json(json!({ "message": message }))).into_response()
        }
        Ok(UpdateOutcome::NoChange) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn delete_user<M, U, P, T, H>(
    State(accounts): State<SharedAccounts<M, U, P, T, H>>,
    AdminOrManager(caller): AdminOrManager,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Response
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    info!(caller = %caller.username, "delete user requested");

    match accounts.delete_user(payload.id).await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("User with '{}' username deleted", deleted.username)
            })),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
