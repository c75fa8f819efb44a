pub mod analysts;
pub mod drivers;
pub mod managers;
pub mod transportation_tasks;
pub mod users;
