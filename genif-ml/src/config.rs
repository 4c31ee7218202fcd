//! Forest configuration
//!
//! All hyperparameters of a [`GeneralizedIsolationForest`](crate::GeneralizedIsolationForest)
//! in one serde-friendly struct. Missing fields take their default values, so
//! a JSON document only needs to name what it changes.

use genif_core::{GenifError, GenifResult, KernelKind};
use serde::{Deserialize, Serialize};

/// Configuration for a Generalized Isolation Forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Representatives drawn per split
    pub k: usize,
    /// Number of trees
    pub n_models: usize,
    /// Bootstrap rows drawn per tree
    pub sample_size: usize,
    /// Kernel identifier: `rbf`, `matern-d1`, `matern-d3` or `matern-d5`
    pub kernel: String,
    /// RBF bandwidth (first entry) or Matérn per-dimension scale
    pub kernel_scaling: Vec<f64>,
    /// Exit threshold on the average kernel value
    pub sigma: f64,
    /// Worker threads, detected parallelism if `None` or 0
    pub worker_count: Option<usize>,
    /// Base seed; trees and samples are random if `None`
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            k: 10,
            n_models: 100,
            sample_size: 256,
            kernel: KernelKind::Rbf.as_str().to_string(),
            kernel_scaling: vec![1.0],
            sigma: 0.5,
            worker_count: None,
            seed: None,
        }
    }
}

impl ForestConfig {
    /// Configuration with the given hyperparameters, detected worker count and no seed
    pub fn new(
        k: usize,
        n_models: usize,
        sample_size: usize,
        kernel: impl Into<String>,
        kernel_scaling: Vec<f64>,
        sigma: f64,
    ) -> Self {
        Self {
            k,
            n_models,
            sample_size,
            kernel: kernel.into(),
            kernel_scaling,
            sigma,
            worker_count: None,
            seed: None,
        }
    }

    /// Use `workers` threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }

    /// Seed every random draw
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parsed kernel identifier
    pub fn kernel_kind(&self) -> GenifResult<KernelKind> {
        self.kernel.parse()
    }

    /// Check the scalar hyperparameters, returning the first problem found
    ///
    /// Kernel parameters are checked when the kernel is built.
    pub fn validate(&self) -> GenifResult<()> {
        if self.k < 2 {
            return Err(GenifError::InvalidConfig {
                reason: "k must be at least 2",
            });
        }
        if self.n_models == 0 {
            return Err(GenifError::InvalidConfig {
                reason: "n_models must be greater than 0",
            });
        }
        if self.sample_size == 0 {
            return Err(GenifError::InvalidConfig {
                reason: "sample_size must be greater than 0",
            });
        }
        self.kernel_kind()?;
        Ok(())
    }

    /// Load from a JSON document and validate
    pub fn from_json(json: &str) -> GenifResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| GenifError::Serialization {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> GenifResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GenifError::Serialization {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ForestConfig::default();
        assert_eq!(config.k, 10);
        assert_eq!(config.n_models, 100);
        assert_eq!(config.kernel_kind().unwrap(), KernelKind::Rbf);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = ForestConfig::new(4, 8, 32, "matern-d3", vec![1.0, 2.0], 0.3)
            .with_workers(2)
            .with_seed(17);
        assert_eq!(config.worker_count, Some(2));
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.kernel_kind().unwrap(), KernelKind::MaternD3);
    }

    #[test]
    fn test_validate_reports_first_problem() {
        let config = ForestConfig {
            k: 1,
            n_models: 0,
            ..ForestConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GenifError::InvalidConfig { reason: "k must be at least 2" })
        );

        let config = ForestConfig {
            kernel: "matern-d2".into(),
            ..ForestConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GenifError::UnknownKernel { name: "matern-d2".into() })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ForestConfig::from_json(r#"{"k": 4, "kernel": "matern-d5", "seed": 9}"#).unwrap();
        assert_eq!(config.k, 4);
        assert_eq!(config.kernel, "matern-d5");
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.n_models, ForestConfig::default().n_models);
    }

    #[test]
    fn test_malformed_json() {
        let err = ForestConfig::from_json("{\"k\": ").unwrap_err();
        assert!(matches!(err, GenifError::Serialization { .. }));
        assert!(err.is_configuration());

        let err = ForestConfig::from_json(r#"{"n_models": 0}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ForestConfig::default().with_seed(3).with_workers(4);
        let restored = ForestConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }
}
