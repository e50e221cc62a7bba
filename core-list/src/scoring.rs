//! Point values per rank
//!
//! Rank 1 is worth `top_value`. Value decays along a concave curve until the
//! legacy cutoff and every legacy rank is worth exactly `min_value`:
//!
//! ```text
//! score(r) = top - (top - min) * ((r - 1) / (cutoff - 1))^0.4
//! ```

use core_runtime::config::ScoringConfig;

/// Last rank of the main list when nothing else is configured
pub const DEFAULT_LEGACY_CUTOFF: usize = 75;

const DECAY_EXPONENT: f64 = 0.4;

/// Score of `rank` with the default legacy cutoff.
///
/// # Panics
///
/// Panics if `rank` is 0 or `min_value > top_value`.
pub fn score(rank: usize, top_value: f64, min_value: f64) -> f64 {
    score_with_cutoff(rank, top_value, min_value, DEFAULT_LEGACY_CUTOFF)
}

/// Score of `rank` on a list whose main section ends at `legacy_cutoff`.
///
/// # Panics
///
/// Panics if `rank` is 0, `legacy_cutoff` is 0 or `min_value > top_value`.
pub fn score_with_cutoff(rank: usize, top_value: f64, min_value: f64, legacy_cutoff: usize) -> f64 {
    assert!(rank >= 1, "rank is 1-based, got 0");
    assert!(legacy_cutoff >= 1, "legacy cutoff must be at least 1");
    assert!(
        min_value <= top_value,
        "min_value ({}) exceeds top_value ({})",
        min_value,
        top_value
    );

    if rank == 1 {
        return top_value;
    }
    if rank > legacy_cutoff {
        return min_value;
    }

    // rank is in 2..=cutoff here, so cutoff >= 2
    let progress = (rank - 1) as f64 / (legacy_cutoff - 1) as f64;
    let value = top_value - (top_value - min_value) * progress.powf(DECAY_EXPONENT);
    value.max(min_value)
}

/// Configured scoring bounds, used by pages to label and score ranks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCurve {
    top_value: f64,
    min_value: f64,
    legacy_cutoff: usize,
}

impl ScoreCurve {
    /// # Panics
    ///
    /// Panics if `min_value > top_value` or `legacy_cutoff` is 0.
    pub fn new(top_value: f64, min_value: f64, legacy_cutoff: usize) -> Self {
        assert!(legacy_cutoff >= 1, "legacy cutoff must be at least 1");
        assert!(
            min_value <= top_value,
            "min_value ({}) exceeds top_value ({})",
            min_value,
            top_value
        );

        Self {
            top_value,
            min_value,
            legacy_cutoff,
        }
    }

    pub fn top_value(&self) -> f64 {
        self.top_value
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn legacy_cutoff(&self) -> usize {
        self.legacy_cutoff
    }

    pub fn score(&self, rank: usize) -> f64 {
        score_with_cutoff(rank, self.top_value, self.min_value, self.legacy_cutoff)
    }

    pub fn is_legacy(&self, rank: usize) -> bool {
        rank > self.legacy_cutoff
    }

    /// `#N` on the main list, `Legacy` past the cutoff
    pub fn rank_label(&self, rank: usize) -> String {
        if self.is_legacy(rank) {
            "Legacy".to_string()
        } else {
            format!("#{}", rank)
        }
    }
}

impl Default for ScoreCurve {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl From<&ScoringConfig> for ScoreCurve {
    /// The config is validated by the builder before it gets here.
    fn from(config: &ScoringConfig) -> Self {
        Self::new(config.top_value, config.min_value, config.legacy_cutoff)
    }
}
