//! Geo-aware user search.
//!
//! Validates and compiles the raw query into a [`ProfileQuery`],
//! delegates the scan to the user repository, and decorates each hit
//! with the derived display fields.

use agrolink_core::error::{AgrolinkError, AgrolinkResult};
use agrolink_core::geo::Coordinates;
use agrolink_core::models::activity::{ActivityAction, CreateActivity};
use agrolink_core::models::search::{ProfileQuery, SearchResult};
use agrolink_core::models::user::Role;
use agrolink_core::repository::{
    ActivityRepository, BadgeRepository, Pagination, UserRepository,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::service::ProfileService;

/// Raw search parameters as received from the client. Coordinates and
/// radius arrive as strings; they are validated before any geographic
/// point is constructed.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Role filter, matched case-insensitively.
    pub role: Option<String>,
    /// Free-text filter against first OR last name.
    pub query: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Radius in kilometers; only meaningful together with an origin.
    pub radius_km: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: u64,
    pub has_more: bool,
}

/// Empty strings are treated the same as absent parameters.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl<U: UserRepository, B: BadgeRepository, A: ActivityRepository> ProfileService<U, B, A> {
    /// Search user profiles on behalf of `caller_id`.
    ///
    /// The caller's own record is excluded unconditionally. With an
    /// origin the results are distance-bounded and ordered nearest
    /// first; without one they come back in `created_at` order.
    /// Purely a read — nothing is mutated and nothing is retried.
    pub async fn search_users(
        &self,
        caller_id: Uuid,
        request: SearchRequest,
        ip_address: Option<String>,
    ) -> AgrolinkResult<SearchPage> {
        let page = request.page.unwrap_or(1).max(1);
        let page_size = request
            .page_size
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        let pagination = Pagination {
            offset: u64::from(page - 1) * u64::from(page_size),
            limit: u64::from(page_size),
        };

        // Validate the origin first so malformed coordinates are
        // reported even when other filters can never match.
        let (origin, radius_km) = self.parse_origin(&request)?;

        // A role filter that names no known role can never match.
        let role = match non_empty(&request.role) {
            Some(raw) => match Role::parse(raw) {
                Some(role) => Some(role),
                None => {
                    return Ok(SearchPage {
                        results: Vec::new(),
                        total: 0,
                        has_more: false,
                    });
                }
            },
            None => None,
        };

        let query = ProfileQuery {
            exclude_id: caller_id,
            role,
            name_contains: non_empty(&request.query).map(str::to_string),
            origin,
            radius_km,
            pagination,
        };

        let paged = self.users.search(query).await?;

        let now = Utc::now();
        let results = paged
            .items
            .iter()
            .map(|hit| SearchResult::from_hit(hit, now))
            .collect();

        self.record_activity(CreateActivity {
            user_id: Some(caller_id),
            action: ActivityAction::Search,
            description: "User search".into(),
            metadata: Some(json!({
                "role": request.role,
                "query": request.query,
                "origin": origin.is_some(),
                "radius_km": origin.map(|_| radius_km),
            })),
            ip_address,
        })
        .await;

        Ok(SearchPage {
            results,
            total: paged.total,
            has_more: paged.has_more(),
        })
    }

    /// Parse the optional origin point and radius.
    ///
    /// An origin requires both coordinates; a lone latitude or
    /// longitude is ignored (matching the update path). Every
    /// malformed numeric field is collected before failing so the
    /// caller sees them all at once, and no point is constructed from
    /// partially validated input.
    fn parse_origin(&self, request: &SearchRequest) -> AgrolinkResult<(Option<Coordinates>, f64)> {
        let (Some(lat), Some(lng)) = (non_empty(&request.latitude), non_empty(&request.longitude))
        else {
            return Ok((None, self.config.default_radius_km));
        };

        let mut bad_fields = Vec::new();

        let lat = lat.trim().parse::<f64>();
        if lat.is_err() {
            bad_fields.push("location_lat".to_string());
        }
        let lng = lng.trim().parse::<f64>();
        if lng.is_err() {
            bad_fields.push("location_lng".to_string());
        }

        let radius_km = match non_empty(&request.radius_km) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(radius) => radius,
                Err(_) => {
                    bad_fields.push("radius".to_string());
                    self.config.default_radius_km
                }
            },
            None => self.config.default_radius_km,
        };

        if !bad_fields.is_empty() {
            return Err(AgrolinkError::InvalidQuery { fields: bad_fields });
        }

        match (lat, lng) {
            // Point order is (longitude, latitude) — x then y.
            (Ok(lat), Ok(lng)) => Ok((Some(Coordinates::new(lng, lat)), radius_km)),
            // Unreachable: parse failures were reported above.
            _ => Ok((None, radius_km)),
        }
    }
}
