//! Candidate scoring implementation
//!
//! Score(c) = Coverage(c) - w_aqi · AQI(c)
//!
//! Coverage is raw population units, so it dominates the ranking. The AQI
//! term is bounded to [floor, base] before weighting and only separates
//! candidates with similar coverage.

use crate::{
    ensure_non_negative, haversine_km, Candidate, PollutionAnchor, PopulationCenter, Region,
    Result, ScoredCandidate, SiteInputs, COVERAGE_RADIUS_KM,
};
use std::f64::consts::PI;
use tracing::debug;

/// Lowest AQI proxy any candidate can get
pub const AQI_FLOOR: f64 = 30.0;

/// AQI proxy at the anchor
pub const AQI_BASE: f64 = 65.0;

/// Total AQI drop from the anchor to the far end of the region
pub const AQI_SPREAD: f64 = 35.0;

/// Weight of the AQI penalty
pub const W_POLLUTION: f64 = 0.5;

/// Scorer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    /// Radius served by one node, also the center-override radius
    pub coverage_radius_km: f64,
    pub aqi_floor: f64,
    pub aqi_base: f64,
    pub aqi_spread: f64,
    /// Weight for the AQI penalty
    pub pollution_weight: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            coverage_radius_km: COVERAGE_RADIUS_KM,
            aqi_floor: AQI_FLOOR,
            aqi_base: AQI_BASE,
            aqi_spread: AQI_SPREAD,
            pollution_weight: W_POLLUTION,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("coverage_radius_km", self.coverage_radius_km)?;
        ensure_non_negative("aqi_floor", self.aqi_floor)?;
        ensure_non_negative("aqi_base", self.aqi_base)?;
        ensure_non_negative("aqi_spread", self.aqi_spread)?;
        ensure_non_negative("pollution_weight", self.pollution_weight)
    }

    /// Area served by one node in km²
    pub fn coverage_area_km2(&self) -> f64 {
        PI * self.coverage_radius_km.powi(2)
    }
}

/// Per-run inputs shared by every candidate
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub centers: &'a [PopulationCenter],
    pub rural_density: f64,
    pub anchor: &'a PollutionAnchor,
    /// AQI normalization distance, see [`max_span_distance`]
    pub max_span_km: f64,
}

/// Longer of the two region diagonals in km
pub fn max_span_distance(region: &Region) -> f64 {
    let sw_ne = haversine_km(region.lat_min, region.lon_min, region.lat_max, region.lon_max);
    let se_nw = haversine_km(region.lat_min, region.lon_max, region.lat_max, region.lon_min);
    sw_ne.max(se_nw)
}

/// Score all candidates, preserving input order
pub fn score_candidates(
    candidates: &[Candidate],
    inputs: &SiteInputs,
    config: &ScorerConfig,
) -> Vec<ScoredCandidate> {
    let ctx = ScoringContext {
        centers: &inputs.centers,
        rural_density: inputs.rural_density,
        anchor: &inputs.anchor,
        max_span_km: max_span_distance(&inputs.region),
    };

    debug!("Max span distance: {:.3} km", ctx.max_span_km);

    candidates
        .iter()
        .map(|c| score_candidate(c, &ctx, config))
        .collect()
}

/// Score a single candidate
pub fn score_candidate(
    candidate: &Candidate,
    ctx: &ScoringContext<'_>,
    config: &ScorerConfig,
) -> ScoredCandidate {
    let coverage = coverage(candidate, ctx, config);
    let pollution_index = pollution_index(candidate, ctx, config);
    let score = coverage - config.pollution_weight * pollution_index;

    debug!(
        "Scored candidate {}: {:.2} (coverage={:.1}, aqi={:.2})",
        candidate.id, score, coverage, pollution_index
    );

    ScoredCandidate {
        candidate: candidate.clone(),
        coverage,
        pollution_index,
        score,
    }
}

/// Population of the first center within the coverage radius, otherwise the
/// rural baseline. Centers are checked in list order.
fn coverage(candidate: &Candidate, ctx: &ScoringContext<'_>, config: &ScorerConfig) -> f64 {
    ctx.centers
        .iter()
        .find(|center| {
            haversine_km(
                candidate.latitude,
                candidate.longitude,
                center.latitude,
                center.longitude,
            ) < config.coverage_radius_km
        })
        .map(|center| center.population as f64)
        .unwrap_or_else(|| ctx.rural_density * config.coverage_area_km2())
}

/// Linear decay from `aqi_base` at the anchor, clamped below at `aqi_floor`
fn pollution_index(candidate: &Candidate, ctx: &ScoringContext<'_>, config: &ScorerConfig) -> f64 {
    let d_anchor = haversine_km(
        candidate.latitude,
        candidate.longitude,
        ctx.anchor.latitude,
        ctx.anchor.longitude,
    );
    let ratio = if ctx.max_span_km > 0.0 {
        d_anchor / ctx.max_span_km
    } else {
        0.0
    };
    config.aqi_floor.max(config.aqi_base - ratio * config.aqi_spread)
}
