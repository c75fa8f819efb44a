pub mod profile_repository;
pub mod session;
pub mod transportation_task_repository;
pub mod user_repository;
