//! End-to-end checks of the splitting guarantees on synthetic survey data.
//!
//! The data mimics a clustered station network: a few dense clusters plus
//! sparse background stations, which is the situation where block splits
//! and random splits differ the most.

use std::collections::HashSet;

use approx::assert_relative_eq;
use geosplit_algorithms::validation::{
    block_k_fold, shuffle_splits, train_test_split, BlockKFoldParams, SplitMethod, SplitParams,
    SplitResult,
};
use geosplit_core::{Error, Observations};

/// Deterministic pseudo-random stations, clustered around a few centres.
fn stations(n: usize) -> Observations {
    let centres = [(-121.0, 37.5), (-118.2, 34.1), (-117.1, 32.7), (-122.4, 40.6)];
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    for i in 0..n {
        if i % 5 == 0 {
            // Background station anywhere in the survey area
            lon.push(-124.0 + 8.0 * next());
            lat.push(32.0 + 10.0 * next());
        } else {
            let (cx, cy) = centres[i % centres.len()];
            lon.push(cx + 0.8 * (next() - 0.5));
            lat.push(cy + 0.8 * (next() - 0.5));
        }
    }
    let velocity: Vec<f64> = lat.iter().map(|y| (y - 37.0) * 0.002).collect();
    let std_dev = vec![0.001; n];
    Observations::from_vecs(lon, lat, vec![velocity, std_dev]).unwrap()
}

fn index_sets(result: &SplitResult) -> (HashSet<usize>, HashSet<usize>) {
    (
        result.train_indices.iter().copied().collect(),
        result.test_indices.iter().copied().collect(),
    )
}

#[test]
fn partition_is_exhaustive_and_disjoint() {
    let obs = stations(500);
    for params in [
        SplitParams::default().with_random_seed(0),
        SplitParams::block(1.0).with_random_seed(0),
        SplitParams::block(0.25).with_test_size(0.1).with_random_seed(3),
    ] {
        let result = train_test_split(&obs, params).unwrap();
        let (train, test) = index_sets(&result);
        assert!(train.is_disjoint(&test));
        let union: HashSet<usize> = train.union(&test).copied().collect();
        assert_eq!(union, (0..obs.len()).collect());
        assert_eq!(result.train.n_columns(), 2);
        assert_eq!(result.test.n_columns(), 2);
    }
}

#[test]
fn same_seed_same_split() {
    let obs = stations(300);
    for method in [SplitMethod::Random, SplitMethod::Block] {
        let params = SplitParams {
            method,
            spacing: Some(0.5),
            random_seed: Some(2024),
            ..Default::default()
        };
        let a = train_test_split(&obs, params).unwrap();
        let b = train_test_split(&obs, params).unwrap();
        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }
}

#[test]
fn random_split_has_exact_test_size() {
    let obs = stations(333);
    for (test_size, expected) in [(0.25, 83), (0.1, 33), (0.5, 167), (0.9, 300)] {
        let params = SplitParams::default()
            .with_test_size(test_size)
            .with_random_seed(1);
        let result = train_test_split(&obs, params).unwrap();
        assert_eq!(result.n_test(), expected, "test_size = {}", test_size);
        assert_relative_eq!(result.test_fraction(), expected as f64 / 333.0);
    }
}

#[test]
fn block_split_keeps_blocks_together() {
    let obs = stations(400);
    let result = train_test_split(&obs, SplitParams::block(0.5).with_random_seed(11)).unwrap();
    let labels = result.blocks.as_ref().unwrap();
    let (_, test) = index_sets(&result);

    for (cell, members) in labels.iter() {
        let n_in_test = members.iter().filter(|&&i| test.contains(&i)).count();
        assert!(
            n_in_test == 0 || n_in_test == members.len(),
            "block {:?} was split",
            cell
        );
    }
}

#[test]
fn block_split_fraction_is_approximate() {
    let obs = stations(400);
    let target = 100; // round(0.25 * 400)
    for seed in 0..20 {
        let result = train_test_split(&obs, SplitParams::block(0.5).with_random_seed(seed)).unwrap();
        let labels = result.blocks.as_ref().unwrap();
        let largest = labels.iter().map(|(_, m)| m.len()).max().unwrap();

        assert!(result.n_test() >= target);
        assert!(result.n_test() < target + largest);
        assert!(result.n_train() > 0);
    }
}

#[test]
fn block_and_random_splits_differ_in_spatial_mixing() {
    // With blocks, most test stations have no training station in the same
    // cell; with a random split nearly every test station does.
    let obs = stations(400);
    let block = train_test_split(&obs, SplitParams::block(0.5).with_random_seed(0)).unwrap();
    let labels = block.blocks.as_ref().unwrap();
    let random = train_test_split(&obs, SplitParams::default().with_random_seed(0)).unwrap();

    let shares_cell = |result: &SplitResult| {
        let train_cells: HashSet<_> = result
            .train_indices
            .iter()
            .filter_map(|&i| labels.cell_of(i))
            .collect();
        result
            .test_indices
            .iter()
            .filter(|&&i| labels.cell_of(i).map_or(false, |c| train_cells.contains(&c)))
            .count()
    };

    assert_eq!(shares_cell(&block), 0);
    assert!(shares_cell(&random) > random.n_test() / 2);
}

#[test]
fn line_scenario() {
    let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
    let obs = Observations::from_vecs(x, vec![0.0; 10], vec![vec![1.0; 10]]).unwrap();
    let params = SplitParams::block(1.0).with_test_size(0.2).with_random_seed(0);

    let first = train_test_split(&obs, params).unwrap();
    let second = train_test_split(&obs, params).unwrap();

    let labels = first.blocks.as_ref().unwrap();
    assert_eq!(labels.n_blocks(), 5);
    assert!(labels.iter().all(|(_, m)| m.len() == 2));
    assert_eq!(first.n_test(), 2);
    assert_eq!(first.n_train(), 8);
    assert_eq!(first.test_indices, second.test_indices);
}

#[test]
fn invalid_parameters_produce_no_output() {
    let obs = stations(50);
    let cases: Vec<(SplitParams, &str)> = vec![
        (SplitParams::default().with_test_size(0.0), "test_size"),
        (SplitParams::default().with_test_size(1.0), "test_size"),
        (SplitParams::block(0.0), "spacing"),
        (SplitParams::block(-2.0), "spacing"),
    ];
    for (params, name) in cases {
        match train_test_split(&obs, params) {
            Err(Error::InvalidParameter { name: got, .. }) => assert_eq!(got, name),
            Ok(_) => panic!("expected {} to be rejected", name),
        }
    }

    assert!("unknown".parse::<SplitMethod>().is_err());
}

#[test]
fn cross_validation_helpers() {
    let obs = stations(300);

    let splits = shuffle_splits(&obs, SplitParams::block(1.0).with_random_seed(7), 5).unwrap();
    assert_eq!(splits.len(), 5);
    assert!(splits.iter().all(|s| s.n_train() + s.n_test() == 300));

    let folds = block_k_fold(
        &obs,
        BlockKFoldParams {
            spacing: Some(1.0),
            n_splits: 4,
            shuffle: true,
            random_seed: Some(7),
        },
    )
    .unwrap();
    let total_test: usize = folds.iter().map(|f| f.test_indices.len()).sum();
    assert_eq!(total_test, 300);
}
