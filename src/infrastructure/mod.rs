/// Runs `$body` against the session's transaction when one is given,
/// otherwise against the pooled connection. Must stay above the `mod` items.
macro_rules! with_connection {
    ($db:expr, $session:expr, $conn:ident => $body:expr) => {
        match $session {
            Some($conn) => $body,
            None => {
                let $conn = &$db;
                $body
            }
        }
    };
}

pub mod argon2_password_hasher;
pub mod db_error;
pub mod entities;
pub mod jwt_token_service;
pub mod profile_repository;
pub mod schema;
pub mod session_manager;
pub mod transportation_task_repository;
pub mod user_repository;
