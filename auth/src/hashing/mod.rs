pub mod argon2;
pub mod errors;

pub use self::argon2::SecretHasher;
pub use errors::HashingError;
