//! Profile service configuration.

/// Configuration for the profile, badge, and search services.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    /// Radius applied to origin-bounded searches when the caller does
    /// not supply one, in kilometers (default: 50).
    pub default_radius_km: f64,
    /// Search page size when the caller does not supply one
    /// (default: 20).
    pub default_page_size: u32,
    /// Upper bound on caller-supplied page sizes (default: 50).
    pub max_page_size: u32,
    /// Maximum bio length in characters (default: 500).
    pub max_bio_chars: usize,
    /// Page size for activity listings (default: 50).
    pub activity_page_size: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 50.0,
            default_page_size: 20,
            max_page_size: 50,
            max_bio_chars: 500,
            activity_page_size: 50,
        }
    }
}
