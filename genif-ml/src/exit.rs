//! Kernel-based exit condition for tree induction
//!
//! A region stops splitting once the average kernel value between its
//! representative and each of its members reaches the threshold σ. Dense,
//! compact regions therefore become leaves early, sparse regions keep being
//! split.

use core::fmt;

use genif_core::{GenifError, GenifResult, Kernel, KernelKind};
use ndarray::ArrayView2;

use crate::node::PartitionNode;

/// Average-kernel-value exit test
pub struct ExitCondition {
    kind: KernelKind,
    kernel: Box<dyn Kernel>,
    sigma: f64,
}

impl ExitCondition {
    /// Build from a kernel identifier, its scaling vector and the threshold σ
    ///
    /// Accepted identifiers: `rbf`, `matern-d1`, `matern-d3`, `matern-d5`.
    pub fn new(kernel: &str, scaling: &[f64], sigma: f64) -> GenifResult<Self> {
        let kind = kernel.parse::<KernelKind>()?;
        Self::from_kind(kind, scaling, sigma)
    }

    /// Build from an already parsed kernel identifier
    pub fn from_kind(kind: KernelKind, scaling: &[f64], sigma: f64) -> GenifResult<Self> {
        if sigma.is_nan() {
            return Err(GenifError::InvalidConfig {
                reason: "exit threshold sigma must be a number",
            });
        }
        Ok(Self {
            kind,
            kernel: kind.build(scaling)?,
            sigma,
        })
    }

    /// Kernel identifier
    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// The kernel used for the test
    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    /// Threshold σ
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Fail if the kernel cannot evaluate rows with `columns` features
    pub fn check_dimensions(&self, columns: usize) -> GenifResult<()> {
        self.kernel.check_dimensions(columns)
    }

    /// Mean kernel value between the node's representative and its members
    pub fn average_kernel_value(&self, dataset: ArrayView2<'_, f64>, node: &PartitionNode) -> f64 {
        if node.is_empty() {
            return f64::INFINITY;
        }
        let representative = dataset.row(node.representative);
        let total: f64 = node
            .indices
            .iter()
            .map(|&i| self.kernel.value(representative, dataset.row(i)))
            .sum();
        total / node.len() as f64
    }

    /// True if the node should stay a leaf
    pub fn should_exit(&self, dataset: ArrayView2<'_, f64>, node: &PartitionNode) -> bool {
        self.average_kernel_value(dataset, node) >= self.sigma
    }
}

impl fmt::Debug for ExitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitCondition")
            .field("kernel", &self.kernel)
            .field("sigma", &self.sigma)
            .finish()
    }
}
