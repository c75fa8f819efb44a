use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        repositories::user_repository::UserRepository,
        services::{password_service::PasswordHasher, token_service::TokenService},
    },
    presentation::error::ApiError,
    usecase::login_usecase::LoginUsecase,
};

/// json for login request
#[derive(Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// json for login response
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub first_name: String,
    pub last_name: String,
}

/// function return Router object
/// Suppose to be nested under "/auth"
pub fn create_auth_router<S, U, P, K>(login_service: Arc<LoginUsecase<S, U, P, K>>) -> Router
where
    S: Send + Sync + 'static,
    U: UserRepository<S> + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    K: TokenService + 'static,
{
    Router::new()
        .route("/", post(login::<S, U, P, K>))
        .with_state(login_service)
}

/// handler function for login
async fn login<S, U, P, K>(
    State(login_service): State<Arc<LoginUsecase<S, U, P, K>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response
where
    S: Send + Sync + 'static,
    U: UserRepository<S> + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    K: TokenService + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    match login_service
        .login(
            payload.username.unwrap_or_default(),
            payload.password.unwrap_or_default(),
        )
        .await
    {
        Ok(result) => {
            let response = LoginResponse {
                access_token: result.token,
                first_name: result.user.first_name().to_string(),
                last_name: result.user.last_name().to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
