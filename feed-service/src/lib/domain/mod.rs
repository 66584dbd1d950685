pub mod auth;
pub mod errors;
pub mod post;
pub mod transaction;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
