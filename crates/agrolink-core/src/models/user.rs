//! User profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

/// Marketplace role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Buyer,
    Cooperative,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Buyer => "buyer",
            Role::Cooperative => "cooperative",
        }
    }

    /// Case-insensitive parse. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "farmer" => Some(Role::Farmer),
            "buyer" => Some(Role::Buyer),
            "cooperative" => Some(Role::Cooperative),
            _ => None,
        }
    }
}

/// Role-specific profile attributes.
///
/// Each variant carries only the optional fields that are legal for
/// that role, so role/field mismatches are unrepresentable once past
/// the update boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleDetails {
    Farmer {
        /// Farm size in hectares.
        farm_size: Option<f64>,
    },
    Buyer {
        business_name: Option<String>,
    },
    Cooperative {
        business_name: Option<String>,
    },
}

impl RoleDetails {
    /// Empty details for a freshly registered user of the given role.
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Farmer => RoleDetails::Farmer { farm_size: None },
            Role::Buyer => RoleDetails::Buyer {
                business_name: None,
            },
            Role::Cooperative => RoleDetails::Cooperative {
                business_name: None,
            },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Farmer { .. } => Role::Farmer,
            RoleDetails::Buyer { .. } => Role::Buyer,
            RoleDetails::Cooperative { .. } => Role::Cooperative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// WGS84 position, set once the user shares a location.
    pub location: Option<Coordinates>,
    pub location_text: Option<String>,
    /// Free-form bio, at most 500 characters (enforced at the update
    /// boundary, not here).
    pub bio: Option<String>,
    /// URL of the hosted profile photo.
    pub profile_photo: Option<String>,
    pub details: RoleDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        self.details.role()
    }

    /// First and last name joined with a space, skipping unset parts.
    pub fn full_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(first) = self.first_name.as_deref()
            && !first.is_empty()
        {
            parts.push(first);
        }
        if let Some(last) = self.last_name.as_deref()
            && !last.is_empty()
        {
            parts.push(last);
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub role: Role,
    pub email: String,
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial profile update, already validated against the user's role.
/// `Some(val)` = set; `None` = leave unchanged. Fields are never
/// cleared through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<Coordinates>,
    pub location_text: Option<String>,
    pub farm_size: Option<f64>,
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}

/// Normalize a local Nigerian phone number to E.164.
///
/// Numbers starting with `0` are rewritten to the `+234` country
/// prefix; anything else is passed through untouched.
pub fn normalize_phone(phone: &str) -> String {
    match phone.strip_prefix('0') {
        Some(rest) => format!("+234{rest}"),
        None => phone.to_string(),
    }
}
