use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{
        models::role::Role,
        services::token_service::{AccessIdentity, TokenService},
    },
    presentation::error::ApiError,
};

/// Rejects requests without a valid bearer token and attaches the verified
/// [`AccessIdentity`] to the request.
pub async fn require_bearer<K: TokenService + 'static>(
    State(tokens): State<Arc<K>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            return ApiError::unauthorized("Not authorized. No valid authorization header")
                .into_response();
        }
    };

    match tokens.verify(token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(_) => ApiError::forbidden("Forbidden").into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor admitting callers holding `Admin` or `Manager`
pub struct AdminOrManager(pub AccessIdentity);

impl<S: Send + Sync> FromRequestParts<S> for AdminOrManager {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<AccessIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authorized"))?;

        if identity.has_any_role(&[Role::Admin, Role::Manager]) {
            Ok(Self(identity))
        } else {
            Err(ApiError::forbidden("Not authorized. Access denied."))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
