//! SurrealDB repository implementations.

mod activity;
mod badge;
mod user;

pub use activity::SurrealActivityRepository;
pub use badge::SurrealBadgeRepository;
pub use user::SurrealUserRepository;
