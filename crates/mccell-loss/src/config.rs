//! Loss configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LossError, LossResult};

/// Configuration for [`crate::HierarchicalLoss`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalLossConfig {
    /// Multiplier on the leaf cross-entropy (default: 8.0).
    pub leaf_weight: f32,
    /// Probability floor before taking logs (default: 1e-7). BCE inputs are
    /// also capped at `1 - epsilon`.
    pub epsilon: f32,
}

impl Default for HierarchicalLossConfig {
    fn default() -> Self {
        Self {
            leaf_weight: 8.0,
            epsilon: 1e-7,
        }
    }
}

impl HierarchicalLossConfig {
    #[must_use]
    pub fn leaf_weight(mut self, weight: f32) -> Self {
        self.leaf_weight = weight;
        self
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// # Errors
    /// `InvalidConfig` for a negative or non-finite `leaf_weight`, or an
    /// `epsilon` outside `(0, 0.5)`.
    pub fn validate(&self) -> LossResult<()> {
        if !self.leaf_weight.is_finite() || self.leaf_weight < 0.0 {
            return Err(LossError::InvalidConfig(format!(
                "leaf_weight must be finite and >= 0, got {}",
                self.leaf_weight
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(LossError::InvalidConfig(format!(
                "epsilon must be in (0, 0.5), got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
