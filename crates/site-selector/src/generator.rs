//! Seeded candidate generation
//!
//! Candidates are drawn uniformly over the region from a `ChaCha8Rng`, whose
//! output stream is fixed for a given seed regardless of platform.

use crate::{Candidate, Region};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Generate `count` candidates uniformly inside `region`.
///
/// Latitude and longitude are drawn independently, latitude first, from
/// `[lat_min, lat_max]` and `[lon_min, lon_max]`. The same
/// `(region, count, seed)` always yields the same sequence.
pub fn generate_candidates(region: &Region, count: usize, seed: u64) -> Vec<Candidate> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let candidates: Vec<Candidate> = (1..=count)
        .map(|id| {
            let latitude = rng.gen_range(region.lat_min..=region.lat_max);
            let longitude = rng.gen_range(region.lon_min..=region.lon_max);
            Candidate {
                id,
                latitude,
                longitude,
            }
        })
        .collect();

    debug!("Generated {} candidates with seed {}", candidates.len(), seed);

    candidates
}
