use std::{collections::HashSet, num::NonZeroUsize};

use experiment::{GridGroup, grid::seeds, para_generator};

fn repeat(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn study() -> Vec<GridGroup> {
    vec![
        GridGroup::new(["robust_ESL"], [600], [500], [50]),
        GridGroup::new(["non_linear"], [600], [50], [10]),
        GridGroup::new(["trend_filter"], [600], [600], [50]),
        GridGroup::new(["linear", "logistic"], [600], [500], [50]),
        GridGroup::new(["ising"], [600], [190], [40]),
    ]
}

#[test]
fn one_trial_per_combination_and_seed() {
    let params = para_generator(&study(), repeat(100), 0);
    assert_eq!(params.len(), 6 * 100);

    let unique: HashSet<_> = params.iter().collect();
    assert_eq!(unique.len(), params.len());
}

#[test]
fn seeds_shared_across_combinations() {
    let params = para_generator(&study(), repeat(5), 3);

    let seeds_of = |model: &str| -> Vec<u64> {
        params
            .iter()
            .filter(|spec| spec.model == model)
            .map(|spec| spec.seed)
            .collect()
    };

    let expected = seeds(repeat(5), 3);
    for model in ["robust_ESL", "non_linear", "trend_filter", "linear", "logistic", "ising"] {
        assert_eq!(seeds_of(model), expected, "{model}");
    }
}

#[test]
fn base_seed_determines_seeds() {
    assert_eq!(seeds(repeat(10), 7), seeds(repeat(10), 7));
    assert_ne!(seeds(repeat(10), 7), seeds(repeat(10), 8));
    assert!(seeds(repeat(10), 7).iter().all(|&s| s < 1 << 32));
}

#[test]
fn groups_expand_independently() {
    let groups = [
        GridGroup::new(["linear"], [100, 200], [50], [5]),
        GridGroup::new(["logistic"], [100], [50], [5, 10]),
    ];

    let params = para_generator(&groups, repeat(1), 0);
    let shapes: Vec<_> = params
        .iter()
        .map(|spec| (spec.model.as_str(), spec.sample_size, spec.sparsity_level))
        .collect();

    assert_eq!(
        shapes,
        [
            ("linear", 100, 5),
            ("linear", 200, 5),
            ("logistic", 100, 5),
            ("logistic", 100, 10),
        ]
    );
}

#[test]
fn group_from_json() {
    let json = r#"{"model": ["linear"], "sample_size": [600], "dim": [500], "sparsity_level": [50]}"#;
    let group: GridGroup = serde_json::from_str(json).unwrap();

    assert_eq!(group, GridGroup::new(["linear"], [600], [500], [50]));
}
