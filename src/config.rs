//! Planner configuration loaded from environment variables.
//!
//! Everything has a development-friendly default except the provider resource
//! names, which identify billable cloud resources and must be set explicitly.

use std::env;

/// Planner configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Location provider resources ---
    /// Provider region, e.g. "ap-southeast-1"
    pub aws_region: String,
    /// Place index resource used for suggestions and text search
    pub place_index: String,
    /// Route calculator resource used for leg geometry
    pub route_calculator: String,
    /// Base URL of the location provider (tests point this at a stub)
    pub location_base_url: String,

    // --- Trip backend ---
    /// Base URL of the club backend (trip persistence)
    pub api_base_url: String,

    // --- Search tuning ---
    /// ISO country filter applied to every place query
    pub country_filter: String,
    /// Fallback bias coordinate `[lng, lat]` when no route exists yet
    pub default_bias: [f64; 2],
    /// Keystroke debounce before a suggestion query fires
    pub debounce_ms: u64,
    /// Per-query result cap for suggestion fan-out
    pub suggest_max_results: u32,
    /// Total unique-suggestion cap across one fan-out
    pub suggest_total_cap: usize,

    // --- Route sampling / POI search ---
    /// Minimum spacing between route bias points
    pub bias_min_distance_km: f64,
    /// Half-width of the bounding box around each bias point
    pub poi_bbox_delta_deg: f64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            aws_region: "ap-southeast-1".to_string(),
            place_index: "BikerTownPlaceIndex-SGP".to_string(),
            route_calculator: "BikerTownRoutes-SGP".to_string(),
            location_base_url: "https://maps.geo.ap-southeast-1.amazonaws.com".to_string(),
            api_base_url: "http://localhost:8000".to_string(),
            country_filter: "VNM".to_string(),
            default_bias: [106.698835880632, 10.7925021280592],
            debounce_ms: 500,
            suggest_max_results: 15,
            suggest_total_cap: 300,
            bias_min_distance_km: 7.0,
            poi_bbox_delta_deg: 0.1,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Config::default();

        let aws_region = env::var("AWS_REGION").unwrap_or(defaults.aws_region);
        let location_base_url = env::var("LOCATION_BASE_URL")
            .unwrap_or_else(|_| format!("https://maps.geo.{}.amazonaws.com", aws_region));

        Ok(Self {
            place_index: env::var("PLACE_INDEX").map_err(|_| ConfigError::Missing("PLACE_INDEX"))?,
            route_calculator: env::var("ROUTE_CALCULATOR")
                .map_err(|_| ConfigError::Missing("ROUTE_CALCULATOR"))?,
            aws_region,
            location_base_url,
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            country_filter: env::var("COUNTRY_FILTER").unwrap_or(defaults.country_filter),
            default_bias: parse_bias(env::var("DEFAULT_BIAS").ok(), defaults.default_bias)?,
            debounce_ms: parse_var("DEBOUNCE_MS", defaults.debounce_ms)?,
            suggest_max_results: parse_var("SUGGEST_MAX_RESULTS", defaults.suggest_max_results)?,
            suggest_total_cap: parse_var("SUGGEST_TOTAL_CAP", defaults.suggest_total_cap)?,
            bias_min_distance_km: parse_var("BIAS_MIN_DISTANCE_KM", defaults.bias_min_distance_km)?,
            poi_bbox_delta_deg: parse_var("POI_BBOX_DELTA_DEG", defaults.poi_bbox_delta_deg)?,
        })
    }
}

/// Parse an optional numeric env var, falling back to the default.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Parse a "lng,lat" bias coordinate.
fn parse_bias(raw: Option<String>, default: [f64; 2]) -> Result<[f64; 2], ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let mut parts = raw.split(',');
    let lng = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or(ConfigError::Invalid("DEFAULT_BIAS"))?;
    let lat = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or(ConfigError::Invalid("DEFAULT_BIAS"))?;
    if parts.next().is_some() {
        return Err(ConfigError::Invalid("DEFAULT_BIAS"));
    }
    Ok([lng, lat])
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Malformed environment variable: {0}")]
    Invalid(&'static str),
}
