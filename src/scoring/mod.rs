pub mod engine;

pub use engine::*;

use crate::models::{DEFAULT_DRAW_THRESHOLD, WeightVector};

/// Process-wide scoring configuration
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Axis weights (fixed, sum to 1.0)
    pub weights: WeightVector,
    /// Draw threshold used when synthesizing verdicts
    pub draw_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: WeightVector::default(),
            draw_threshold: DEFAULT_DRAW_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_config_default() {
        let config = ScoringConfig::default();
        assert_eq!(config.draw_threshold, 10);
        assert_eq!(config.weights, WeightVector::default());
    }
}
