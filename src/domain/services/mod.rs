pub mod password_service;
pub mod profile_resolver;
pub mod token_service;
