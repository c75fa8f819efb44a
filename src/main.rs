mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;
mod usecase;

use std::sync::Arc;

use axum::{Router, response::IntoResponse, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    domain::{
        repositories::{
            profile_repository::ProfileRepository, session::SessionManager,
            transportation_task_repository::TransportationTaskRepository,
            user_repository::UserRepository,
        },
        services::{password_service::PasswordHasher, token_service::TokenService},
    },
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher, jwt_token_service::JwtTokenService,
        profile_repository::SeaOrmProfileRepository, schema::ensure_schema,
        session_manager::SeaOrmSessionManager,
        transportation_task_repository::SeaOrmTransportationTaskRepository,
        user_repository::SeaOrmUserRepository,
    },
    presentation::{
        error::ApiError,
        handlers::{auth_handler::create_auth_router, user_handler::create_user_router},
        middleware::require_bearer,
    },
    usecase::{login_usecase::LoginUsecase, user_account_usecase::UserAccountUsecase},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let mut opt = ConnectOptions::new(config.database.url.clone());
    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .sqlx_logging(config.database.sql_logging);

    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;

    let user_repository = SeaOrmUserRepository::new(db.clone());
    let password_hasher = Argon2PasswordHasher::new();
    let token_service = JwtTokenService::with_expiration(
        config.security.access_token_secret.clone(),
        config.security.access_token_ttl_minutes,
    );

    let accounts = UserAccountUsecase::new(
        SeaOrmSessionManager::new(db.clone()),
        user_repository.clone(),
        SeaOrmProfileRepository::new(db.clone()),
        SeaOrmTransportationTaskRepository::new(db.clone()),
        password_hasher.clone(),
    );
    let login_service = LoginUsecase::new(user_repository, password_hasher, token_service.clone());

    let app = create_app(accounts, login_service, token_service);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Full route table: `/auth` is public, everything under `/users` needs a bearer token.
fn create_app<M, U, P, T, H, K>(
    accounts: UserAccountUsecase<M, U, P, T, H>,
    login_service: LoginUsecase<M::Session, U, H, K>,
    token_service: K,
) -> Router
where
    M: SessionManager + Send + Sync + 'static,
    U: UserRepository<M::Session> + Send + Sync + 'static,
    P: ProfileRepository<M::Session> + Send + Sync + 'static,
    T: TransportationTaskRepository<M::Session> + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    K: TokenService + 'static,
{
    let users = create_user_router(accounts).layer(axum::middleware::from_fn_with_state(
        Arc::new(token_service),
        require_bearer::<K>,
    ));

    Router::new()
        .route("/", get(|| async { "api running" }))
        .nest("/auth", create_auth_router(Arc::new(login_service)))
        .nest("/users", users)
        .fallback(|| async { ApiError::not_found("404 Not Found").into_response() })
        .layer(TraceLayer::new_for_http())
}
