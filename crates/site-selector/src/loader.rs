//! Scenario loading and validation

use crate::{
    ensure_finite, ensure_non_negative, PollutionAnchor, PopulationCenter, Region, Result,
    SelectorError, SiteInputs,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

impl SiteInputs {
    /// Reject scenarios that cannot be scored meaningfully.
    ///
    /// Centers and the anchor are expected inside the region but only
    /// logged when they are not.
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        ensure_non_negative("rural_density", self.rural_density)?;

        ensure_finite("anchor.latitude", self.anchor.latitude)?;
        ensure_finite("anchor.longitude", self.anchor.longitude)?;
        ensure_non_negative("anchor.base_value", self.anchor.base_value)?;
        if !self.region.contains(self.anchor.latitude, self.anchor.longitude) {
            warn!(
                "Pollution anchor ({:.4}, {:.4}) lies outside the region",
                self.anchor.latitude, self.anchor.longitude
            );
        }

        for center in &self.centers {
            ensure_finite(&format!("{}.latitude", center.name), center.latitude)?;
            ensure_finite(&format!("{}.longitude", center.name), center.longitude)?;
            if !self.region.contains(center.latitude, center.longitude) {
                warn!(
                    "Population center {} ({:.4}, {:.4}) lies outside the region",
                    center.name, center.latitude, center.longitude
                );
            }
        }

        Ok(())
    }
}

/// Raw population center from JSON, population still signed
#[derive(Debug, Deserialize)]
struct RawCenter {
    name: String,
    latitude: f64,
    longitude: f64,
    population: i64,
}

impl TryFrom<RawCenter> for PopulationCenter {
    type Error = SelectorError;

    fn try_from(raw: RawCenter) -> Result<Self> {
        let population = u64::try_from(raw.population).map_err(|_| SelectorError::NegativeValue {
            field: format!("{}.population", raw.name),
            value: raw.population as f64,
        })?;

        Ok(Self {
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
            population,
        })
    }
}

/// Raw scenario file
#[derive(Debug, Deserialize)]
struct RawScenario {
    region: Region,
    #[serde(default)]
    centers: Vec<RawCenter>,
    rural_density: f64,
    anchor: PollutionAnchor,
}

/// Load and validate a scenario from a JSON file
pub fn load_inputs(path: impl AsRef<Path>) -> Result<SiteInputs> {
    let path = path.as_ref();
    info!("Loading scenario from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: RawScenario = serde_json::from_reader(reader)?;

    let inputs = SiteInputs {
        region: raw.region,
        centers: raw
            .centers
            .into_iter()
            .map(PopulationCenter::try_from)
            .collect::<Result<Vec<_>>>()?,
        rural_density: raw.rural_density,
        anchor: raw.anchor,
    };
    inputs.validate()?;

    info!(
        "Loaded scenario with {} population centers",
        inputs.centers.len()
    );

    Ok(inputs)
}
