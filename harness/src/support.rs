use std::collections::BTreeSet;

use ndarray::ArrayView1;

/// The set of indices at which a parameter vector is non zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Support(BTreeSet<usize>);

impl Support {
    /// Returns the support of `params`.
    pub fn of(params: ArrayView1<f64>) -> Self {
        let indices = params
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0.)
            .map(|(i, _)| i)
            .collect();

        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// The fraction of this support found in `recovered`, normalized by `sparsity_level`.
    ///
    /// # Arguments
    /// * `recovered` - The support a solver recovered.
    /// * `sparsity_level` - The amount of entries the solver was asked for.
    pub fn accuracy(&self, recovered: &BTreeSet<usize>, sparsity_level: usize) -> f64 {
        let hits = recovered.intersection(&self.0).count();
        hits as f64 / sparsity_level as f64
    }
}

impl From<BTreeSet<usize>> for Support {
    fn from(value: BTreeSet<usize>) -> Self {
        Self(value)
    }
}
