pub mod follower;
pub mod post;
pub mod role;
pub mod tag;
pub mod token;
pub mod user;

pub use follower::PostgresFollowerRepository;
pub use post::PostgresPostRepository;
pub use role::PostgresRoleRepository;
pub use tag::PostgresTagRepository;
pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;
