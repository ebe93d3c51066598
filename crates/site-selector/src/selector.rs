//! Greedy selection with an exclusion radius

use crate::{haversine_km, ScoredCandidate, SelectionMetadata, SelectionResult};
use tracing::{debug, info};

/// Pick up to `target_count` candidates best-first.
///
/// Each round takes the highest-scoring candidate left in the pool (ties go
/// to the one earliest in pool order), then drops every remaining candidate
/// closer than `exclusion_radius_km` to it. Stops early once the pool is
/// empty, so the result may be shorter than `target_count`.
///
/// `scored` is not modified; the rounds run on a private copy.
pub fn select(
    scored: &[ScoredCandidate],
    target_count: usize,
    exclusion_radius_km: f64,
) -> SelectionResult {
    let mut pool: Vec<ScoredCandidate> = scored.to_vec();
    let mut selected: Vec<ScoredCandidate> = Vec::with_capacity(target_count.min(pool.len()));

    while selected.len() < target_count {
        let Some(best_idx) = best_index(&pool) else {
            break;
        };
        let best = pool.remove(best_idx);

        let before = pool.len();
        pool.retain(|c| {
            haversine_km(
                best.candidate.latitude,
                best.candidate.longitude,
                c.candidate.latitude,
                c.candidate.longitude,
            ) >= exclusion_radius_km
        });

        debug!(
            "Selected candidate {} (score={:.2}), suppressed {}, {} left",
            best.candidate.id,
            best.score,
            before - pool.len(),
            pool.len()
        );

        selected.push(best);
    }

    if selected.len() < target_count {
        info!(
            "Pool exhausted after {} of {} selections",
            selected.len(),
            target_count
        );
    } else {
        info!("Selected {} sites", selected.len());
    }

    let metadata = SelectionMetadata {
        total_candidates: scored.len(),
        target_count,
        selected_count: selected.len(),
        exclusion_radius_km,
    };

    SelectionResult { selected, metadata }
}

/// Index of the first candidate holding the maximum score
fn best_index(pool: &[ScoredCandidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in pool.iter().enumerate() {
        match best {
            Some((_, score)) if c.score <= score => {}
            _ => best = Some((i, c.score)),
        }
    }
    best.map(|(i, _)| i)
}
