use std::num::NonZeroUsize;

use harness::TrialSpec;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Candidate values per trial field. Expands to every combination of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GridGroup {
    pub model: Vec<String>,
    pub sample_size: Vec<usize>,
    pub dim: Vec<usize>,
    pub sparsity_level: Vec<usize>,
}

impl GridGroup {
    pub fn new<S: Into<String>>(
        model: impl IntoIterator<Item = S>,
        sample_size: impl IntoIterator<Item = usize>,
        dim: impl IntoIterator<Item = usize>,
        sparsity_level: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            model: model.into_iter().map(Into::into).collect(),
            sample_size: sample_size.into_iter().collect(),
            dim: dim.into_iter().collect(),
            sparsity_level: sparsity_level.into_iter().collect(),
        }
    }

    /// The amount of combinations of this group.
    pub fn len(&self) -> usize {
        self.model.len() * self.sample_size.len() * self.dim.len() * self.sparsity_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination of the group's values with `seed`, the last field varying fastest.
    fn expand(&self, seed: u64) -> impl Iterator<Item = TrialSpec> + '_ {
        self.model.iter().flat_map(move |model| {
            self.sample_size.iter().flat_map(move |&sample_size| {
                self.dim.iter().flat_map(move |&dim| {
                    self.sparsity_level.iter().map(move |&sparsity_level| {
                        TrialSpec::new(model.as_str(), sample_size, dim, sparsity_level, seed)
                    })
                })
            })
        })
    }
}

/// Draws `repeat` seeds from a generator seeded with `seed`.
pub fn seeds(repeat: NonZeroUsize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..repeat.get())
        .map(|_| rng.random_range(0..1 << 32))
        .collect()
}

/// Expands `groups` into trial specifications.
///
/// Every combination of every group is repeated once per seed, and the same `repeat` seeds,
/// derived from `seed`, are shared by all of them.
///
/// # Arguments
/// * `groups` - The value lists to combine, each group expanded on its own.
/// * `repeat` - How many seeds each combination gets.
/// * `seed` - The base seed the trial seeds are derived from.
pub fn para_generator(groups: &[GridGroup], repeat: NonZeroUsize, seed: u64) -> Vec<TrialSpec> {
    let seeds = seeds(repeat, seed);

    groups
        .iter()
        .flat_map(|group| {
            seeds
                .iter()
                .flat_map(move |&seed| group.expand(seed))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_len() {
        let group = GridGroup::new(["linear", "logistic"], [600], [500, 250], [50]);
        assert_eq!(group.len(), 4);
        assert_eq!(group.expand(3).count(), 4);
    }

    #[test]
    fn empty_field_empties_group() {
        let group = GridGroup::new(["linear"], [600], [], [50]);

        assert!(group.is_empty());
        assert_eq!(group.expand(0).count(), 0);
    }

    #[test]
    fn expand_order() {
        let group = GridGroup::new(["linear"], [10], [5, 6], [1, 2]);
        let dims: Vec<_> = group
            .expand(0)
            .map(|spec| (spec.dim, spec.sparsity_level))
            .collect();

        assert_eq!(dims, [(5, 1), (5, 2), (6, 1), (6, 2)]);
    }
}
