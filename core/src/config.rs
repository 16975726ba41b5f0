use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::index::Field;

/// Per-field multipliers applied to every token a field contributes.
///
/// A weight of zero or below disables the field entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub owner: f64,
    pub name: f64,
    pub description: f64,
    pub readme: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self { owner: 0.5, name: 2.0, description: 1.2, readme: 0.4 }
    }
}

impl FieldWeights {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Owner => self.owner,
            Field::Name => self.name,
            Field::Description => self.description,
            Field::Readme => self.readme,
        }
    }
}

/// Ranking parameters, fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub field_weights: FieldWeights,
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization strength, in `[0, 1]`.
    pub b: f64,
    /// Constant added inside the IDF logarithm.
    pub k: f64,
    /// Floor added to the saturated frequency of every matched term.
    pub delta: f64,
    /// Cap on tokens read from each readme. `None` reads everything.
    pub max_readme_tokens: Option<usize>,
    /// Cap on query tokens considered per search, applied before deduplication.
    pub max_keywords: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            field_weights: FieldWeights::default(),
            k1: 1.2,
            b: 0.75,
            k: 1.0,
            delta: 0.5,
            max_readme_tokens: None,
            max_keywords: 64,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let weight = self.field_weights.get(field);
            ensure!(weight.is_finite(), "field weight for {field} must be finite, got {weight}");
        }
        ensure!(
            self.k1.is_finite() && self.k1 >= 0.0,
            "k1 must be a non-negative number, got {}",
            self.k1
        );
        ensure!((0.0..=1.0).contains(&self.b), "b must lie in [0, 1], got {}", self.b);
        // A negative k can drive the IDF log argument to zero or below.
        ensure!(
            self.k.is_finite() && self.k >= 0.0,
            "k must be a non-negative number, got {}",
            self.k
        );
        ensure!(self.delta.is_finite(), "delta must be finite, got {}", self.delta);
        Ok(())
    }
}
