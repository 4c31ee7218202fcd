//! Matérn kernel for half-integer smoothness
//!
//! With K = ‖(x1 − x2) ⊘ Σ‖ · √d:
//!
//! ```text
//! d = 1:  l² · exp(−K)
//! d = 3:  l² · (1 + K) · exp(−K)
//! d = 5:  l² · (1 + K + K²/3) · exp(−K)
//! ```

use ndarray::{Array1, ArrayView1};

use super::Kernel;
use crate::errors::{GenifError, GenifResult};

/// Matérn kernel with a per-dimension scale vector Σ
#[derive(Debug, Clone, PartialEq)]
pub struct MaternKernel {
    /// Per-dimension scales
    scale: Array1<f64>,
    /// Smoothness order (1, 3 or 5)
    d: u32,
    /// Output scale
    l: f64,
    /// Cached l²
    l2: f64,
    /// Cached √d
    sqrt_d: f64,
}

impl MaternKernel {
    /// Create a Matérn kernel with unit output scale
    pub fn new(scale: impl Into<Array1<f64>>, d: u32) -> GenifResult<Self> {
        Self::with_output_scale(scale, d, 1.0)
    }

    /// Create a Matérn kernel with output scale `l`
    pub fn with_output_scale(scale: impl Into<Array1<f64>>, d: u32, l: f64) -> GenifResult<Self> {
        if !matches!(d, 1 | 3 | 5) {
            return Err(GenifError::UnsupportedMaternOrder { order: d });
        }

        let scale = scale.into();
        if scale.is_empty() {
            return Err(GenifError::InvalidConfig {
                reason: "matern kernel needs one scale per input dimension",
            });
        }
        if scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(GenifError::InvalidConfig {
                reason: "matern scales must be positive and finite",
            });
        }
        if !l.is_finite() {
            return Err(GenifError::InvalidConfig {
                reason: "matern output scale must be finite",
            });
        }

        Ok(Self {
            scale,
            d,
            l,
            l2: l * l,
            sqrt_d: f64::from(d).sqrt(),
        })
    }

    /// Smoothness order d
    pub fn d(&self) -> u32 {
        self.d
    }

    /// Output scale l
    pub fn l(&self) -> f64 {
        self.l
    }

    /// Per-dimension scale vector Σ
    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }
}

impl Kernel for MaternKernel {
    fn value(&self, x1: ArrayView1<'_, f64>, x2: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(x1.len(), self.scale.len());
        debug_assert_eq!(x2.len(), self.scale.len());

        let scaled_sq: f64 = x1
            .iter()
            .zip(x2.iter())
            .zip(self.scale.iter())
            .map(|((a, b), s)| {
                let diff = a / s - b / s;
                diff * diff
            })
            .sum();
        let k = scaled_sq.sqrt() * self.sqrt_d;

        let poly = match self.d {
            1 => 1.0,
            3 => 1.0 + k,
            _ => 1.0 + k + k * k / 3.0,
        };
        self.l2 * poly * (-k).exp()
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.scale.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn unsupported_order() {
        for d in [0, 2, 4, 6] {
            assert_eq!(
                MaternKernel::new(vec![1.0], d),
                Err(GenifError::UnsupportedMaternOrder { order: d })
            );
        }
    }

    #[test]
    fn rejects_bad_scales() {
        assert!(MaternKernel::new(Vec::<f64>::new(), 3).is_err());
        assert!(MaternKernel::new(vec![1.0, 0.0], 3).is_err());
        assert!(MaternKernel::new(vec![1.0, -2.0], 3).is_err());
    }

    #[test]
    fn self_value_is_l_squared() {
        let x = array![0.5, -2.0];
        for d in [1, 3, 5] {
            let kernel = MaternKernel::with_output_scale(vec![1.0, 2.0], d, 2.0).unwrap();
            assert_eq!(kernel.value(x.view(), x.view()), 4.0);
        }
    }

    #[test]
    fn closed_forms() {
        // Unit scales, distance 1: K = √d
        let a = array![0.0, 0.0];
        let b = array![1.0, 0.0];

        let k1 = MaternKernel::new(vec![1.0, 1.0], 1).unwrap();
        assert!((k1.value(a.view(), b.view()) - (-1.0f64).exp()).abs() < 1e-12);

        let k3 = MaternKernel::new(vec![1.0, 1.0], 3).unwrap();
        let r3 = 3f64.sqrt();
        assert!((k3.value(a.view(), b.view()) - (1.0 + r3) * (-r3).exp()).abs() < 1e-12);

        let k5 = MaternKernel::new(vec![1.0, 1.0], 5).unwrap();
        let r5 = 5f64.sqrt();
        let expected = (1.0 + r5 + r5 * r5 / 3.0) * (-r5).exp();
        assert!((k5.value(a.view(), b.view()) - expected).abs() < 1e-12);
    }

    #[test]
    fn scale_stretches_dimension() {
        let a = array![0.0, 0.0];
        let b = array![4.0, 0.0];
        let tight = MaternKernel::new(vec![1.0, 1.0], 3).unwrap();
        let wide = MaternKernel::new(vec![4.0, 1.0], 3).unwrap();
        assert!(wide.value(a.view(), b.view()) > tight.value(a.view(), b.view()));
        assert_eq!(wide.scale(), array![4.0, 1.0].view());
        assert_eq!(wide.d(), 3);
        assert_eq!(wide.l(), 1.0);
    }

    proptest! {
        #[test]
        fn symmetric(
            a in prop::collection::vec(-1e3f64..1e3, 3),
            b in prop::collection::vec(-1e3f64..1e3, 3),
            d in prop::sample::select(vec![1u32, 3, 5]),
        ) {
            let kernel = MaternKernel::new(vec![0.5, 2.0, 10.0], d).unwrap();
            let x1 = Array1::from(a);
            let x2 = Array1::from(b);
            let forward = kernel.value(x1.view(), x2.view());
            prop_assert_eq!(forward, kernel.value(x2.view(), x1.view()));
            prop_assert!(forward >= 0.0);
        }
    }
}
