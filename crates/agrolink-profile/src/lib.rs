//! Agrolink Profile — profile updates with role-conditional
//! validation, trust badge recompute/status, and geo-aware user
//! search.

pub mod config;
pub mod search;
pub mod service;
pub mod status;

pub use config::ProfileConfig;
pub use search::{SearchPage, SearchRequest};
pub use service::{ProfileService, ProfileView, UpdateProfileInput};
pub use status::BadgeStatus;
