//! 5G Node Site Selector
//!
//! Generates a seeded pool of candidate sites inside a region, scores each
//! one on population coverage against an air-quality penalty, and greedily
//! picks a spatially diverse subset.
//!
//! # Scoring Model
//!
//! ```text
//! Score(c) = Coverage(c) - 0.5 · AQI(c)
//! ```
//!
//! | Term     | Definition |
//! |----------|------------|
//! | Coverage | Population of the first center within 10 km, else rural density · π · 10² |
//! | AQI      | max(30, 65 - (d_anchor / D_max) · 35) |
//! | D_max    | Longer of the two region diagonals |
//!
//! # Selection
//!
//! Best-first greedy pick with a 10 km exclusion radius around every
//! selected site, stopping after 10 sites or when the pool runs dry.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub mod generator;
pub mod loader;
pub mod report;
pub mod scorer;
pub mod selector;

pub use report::{format_report, Report, ReportRow};
pub use scorer::ScorerConfig;

/// Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Number of candidates generated per run
pub const CANDIDATE_COUNT: usize = 100;

/// Number of sites to select
pub const TARGET_COUNT: usize = 10;

/// Radius served by a single node
pub const COVERAGE_RADIUS_KM: f64 = 10.0;

/// Minimum distance between two selected sites
pub const EXCLUSION_RADIUS_KM: f64 = 10.0;

/// Seed for the candidate generator
pub const DEFAULT_SEED: u64 = 42;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid region: {axis} min ({min}) must be less than max ({max})")]
    InvalidRegion { axis: Axis, min: f64, max: f64 },
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue { field: String, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: String },
}

pub type Result<T> = std::result::Result<T, SelectorError>;

/// Region axis, used to name the violated bound in validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Rectangular search region in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl Region {
    /// Build a region, rejecting inverted or degenerate bounds
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Result<Self> {
        let region = Self {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("region.lat_min", self.lat_min)?;
        ensure_finite("region.lon_min", self.lon_min)?;
        ensure_finite("region.lat_max", self.lat_max)?;
        ensure_finite("region.lon_max", self.lon_max)?;

        if self.lat_min >= self.lat_max {
            return Err(SelectorError::InvalidRegion {
                axis: Axis::Latitude,
                min: self.lat_min,
                max: self.lat_max,
            });
        }
        if self.lon_min >= self.lon_max {
            return Err(SelectorError::InvalidRegion {
                axis: Axis::Longitude,
                min: self.lon_min,
                max: self.lon_max,
            });
        }
        Ok(())
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }
}

/// A weighted population center (city, town)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationCenter {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
}

/// Reference point where air quality is worst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutionAnchor {
    pub latitude: f64,
    pub longitude: f64,
    /// Baseline AQI reading at the anchor
    pub base_value: f64,
}

/// A generated candidate site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based generation index
    pub id: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Candidate with its computed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// People served (center population or rural baseline)
    pub coverage: f64,
    /// Distance-decayed AQI proxy, bounded to [30, 65]
    pub pollution_index: f64,
    /// coverage - 0.5 · pollution_index
    pub score: f64,
}

/// Ordered selection, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected: Vec<ScoredCandidate>,
    pub metadata: SelectionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    pub total_candidates: usize,
    pub target_count: usize,
    pub selected_count: usize,
    pub exclusion_radius_km: f64,
}

/// Everything the caller supplies about the area being planned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInputs {
    pub region: Region,
    #[serde(default)]
    pub centers: Vec<PopulationCenter>,
    /// People per km² outside population centers
    pub rural_density: f64,
    pub anchor: PollutionAnchor,
}

impl Default for SiteInputs {
    /// Nairobi-area planning defaults: two cities 0.1° apart at the SW corner
    fn default() -> Self {
        let region = Region {
            lat_min: -1.5167,
            lon_min: 36.75,
            lat_max: -0.75,
            lon_max: 37.75,
        };
        let centers = (0..2)
            .map(|i| PopulationCenter {
                name: format!("City {}", i + 1),
                latitude: region.lat_min + i as f64 * 0.1,
                longitude: region.lon_min + i as f64 * 0.1,
                population: 100_000,
            })
            .collect();

        Self {
            region,
            centers,
            rural_density: 165.0,
            anchor: PollutionAnchor {
                latitude: region.lat_min,
                longitude: region.lon_min,
                base_value: 65.0,
            },
        }
    }
}

/// Run parameters that are not part of the scenario
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeParams {
    pub candidate_count: usize,
    pub seed: u64,
    pub target_count: usize,
    pub exclusion_radius_km: f64,
    pub scorer: ScorerConfig,
}

impl Default for OptimizeParams {
    fn default() -> Self {
        Self {
            candidate_count: CANDIDATE_COUNT,
            seed: DEFAULT_SEED,
            target_count: TARGET_COUNT,
            exclusion_radius_km: EXCLUSION_RADIUS_KM,
            scorer: ScorerConfig::default(),
        }
    }
}

impl OptimizeParams {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("exclusion_radius_km", self.exclusion_radius_km)?;
        self.scorer.validate()
    }
}

/// Full pipeline: validate, generate, score, select.
///
/// All validation happens up front; once candidates are generated nothing
/// can fail.
pub fn optimize(inputs: &SiteInputs, params: &OptimizeParams) -> Result<SelectionResult> {
    inputs.validate()?;
    params.validate()?;

    let candidates =
        generator::generate_candidates(&inputs.region, params.candidate_count, params.seed);
    let scored = scorer::score_candidates(&candidates, inputs, &params.scorer);

    info!(
        "Scored {} candidates (seed={}, centers={})",
        scored.len(),
        params.seed,
        inputs.centers.len()
    );

    Ok(selector::select(
        &scored,
        params.target_count,
        params.exclusion_radius_km,
    ))
}

/// Haversine distance between two points in km
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SelectorError::NonFinite {
            field: field.to_string(),
        })
    }
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(SelectorError::NegativeValue {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_haversine() {
        // Nairobi to Mombasa: ~440 km
        let dist = haversine_km(-1.2864, 36.8172, -4.0435, 39.6682);
        assert!((dist - 440.0).abs() < 10.0, "got {dist}");

        // Same point: exactly 0 km
        assert_eq!(haversine_km(-1.5167, 36.75, -1.5167, 36.75), 0.0);
    }

    #[test]
    fn test_haversine_collinear_meridian() {
        // Points along one meridian add up
        let ab = haversine_km(0.0, 36.0, 0.5, 36.0);
        let bc = haversine_km(0.5, 36.0, 1.0, 36.0);
        let ac = haversine_km(0.0, 36.0, 1.0, 36.0);
        assert!((ab + bc - ac).abs() < 1e-9);
    }

    #[test]
    fn test_region_rejects_inverted_bounds() {
        let err = Region::new(-0.75, 36.75, -1.5167, 37.75).unwrap_err();
        assert!(matches!(
            err,
            SelectorError::InvalidRegion {
                axis: Axis::Latitude,
                ..
            }
        ));

        let err = Region::new(-1.5, 37.0, -0.75, 37.0).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_region_rejects_nan() {
        let err = Region::new(f64::NAN, 36.75, -0.75, 37.75).unwrap_err();
        assert!(matches!(err, SelectorError::NonFinite { .. }));
    }

    #[test]
    fn test_default_inputs_match_planning_defaults() {
        let inputs = SiteInputs::default();
        assert!(inputs.validate().is_ok());
        assert_eq!(inputs.centers.len(), 2);
        assert_eq!(inputs.centers[1].name, "City 2");
        assert!((inputs.centers[1].latitude - (-1.4167)).abs() < 1e-9);
        assert_eq!(inputs.anchor.latitude, inputs.region.lat_min);
    }

    #[test]
    fn test_optimize_rejects_negative_exclusion_radius() {
        let params = OptimizeParams {
            exclusion_radius_km: -1.0,
            ..Default::default()
        };
        let err = optimize(&SiteInputs::default(), &params).unwrap_err();
        assert!(err.to_string().contains("exclusion_radius_km"));
    }

    proptest! {
        #[test]
        fn prop_haversine_symmetric(
            lat1 in -90.0f64..=90.0,
            lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0,
            lon2 in -180.0f64..=180.0,
        ) {
            let ab = haversine_km(lat1, lon1, lat2, lon2);
            let ba = haversine_km(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
            prop_assert!(ab >= 0.0);
        }

        #[test]
        fn prop_haversine_identity(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            prop_assert_eq!(haversine_km(lat, lon, lat, lon), 0.0);
        }
    }
}
