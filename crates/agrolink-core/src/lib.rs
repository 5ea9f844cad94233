//! Agrolink Core — domain models, error taxonomy, repository traits,
//! and the pure scoring engines (profile completion, badge tiers,
//! great-circle geometry).

pub mod completion;
pub mod error;
pub mod geo;
pub mod models;
pub mod repository;

pub use completion::profile_completion;
pub use error::{AgrolinkError, AgrolinkResult, FieldError};
pub use geo::Coordinates;
