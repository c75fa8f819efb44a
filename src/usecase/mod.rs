pub mod login_usecase;
pub mod referential_guard;
pub mod user_account_usecase;
