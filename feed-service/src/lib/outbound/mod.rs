pub mod database;
pub mod email;
pub mod repositories;
