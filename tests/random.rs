mod common;

use std::collections::HashSet;

use test_log::test;

use ta_rs::inclusion::{check_inclusion, InclusionParams};
use ta_rs::simulation::{compute_downward_simulation, compute_upward_simulation};
use ta_rs::tree::Tree;

const SEEDS: u64 = 40;

#[test]
fn test_all_strategies_agree() {
    let (alphabet, _) = common::alphabet();
    let trees = Tree::enumerate(&alphabet, 3);
    let params = common::all_params();

    for seed in 0..SEEDS {
        let mut rng = common::rng(seed);
        let left = common::random_aut(&mut rng, &alphabet, 4, 0.6);
        let right = common::random_aut(&mut rng, &alphabet, 4, 0.6);

        let expected = check_inclusion(&left, &right, &InclusionParams::default());
        for p in &params {
            assert_eq!(check_inclusion(&left, &right, p), expected, "seed {} with {:?}", seed, p);
        }

        // A bounded counterexample refutes inclusion.
        let witness = trees.iter().find(|t| left.accepts(t) && !right.accepts(t));
        if let Some(t) = witness {
            assert!(!expected, "seed {}: {} is a counterexample", seed, t.display(&alphabet));
        }
    }
}

#[test]
fn test_verdicts_match_saturation() {
    let (alphabet, _) = common::alphabet();
    let params = common::all_params();
    let mut holds = 0;
    let mut fails = 0;

    for seed in 0..SEEDS {
        let mut rng = common::rng(4000 + seed);
        let left = common::random_aut(&mut rng, &alphabet, 4, 0.6);
        let right = common::random_aut(&mut rng, &alphabet, 4, 0.6);
        let reduced = left.reduce();

        for (x, y) in [(&left, &right), (&right, &left), (&left, &reduced)] {
            let expected = common::included_by_saturation(x, y);
            if expected {
                holds += 1;
            } else {
                fails += 1;
            }
            for p in &params {
                assert_eq!(check_inclusion(x, y, p), expected, "seed {} with {:?}", seed, p);
            }

            match x.counterexample(y) {
                Some(t) => {
                    assert!(!expected, "seed {}", seed);
                    assert!(x.accepts(&t) && !y.accepts(&t), "seed {}: {}", seed, t.display(&alphabet));
                }
                None => assert!(expected, "seed {}", seed),
            }
        }
    }
    assert!(holds >= SEEDS as usize);
    assert!(fails > 0);
}

#[test]
fn test_inclusion_reflexive() {
    let (alphabet, _) = common::alphabet();
    let params = common::all_params();
    for seed in 0..SEEDS {
        let aut = common::random_aut(&mut common::rng(seed), &alphabet, 5, 0.5);
        for p in &params {
            assert!(check_inclusion(&aut, &aut, p), "seed {} with {:?}", seed, p);
        }
    }
}

#[test]
fn test_reduction_preserves_language() {
    let (alphabet, _) = common::alphabet();
    let trees = Tree::enumerate(&alphabet, 3);
    for seed in 0..SEEDS {
        let aut = common::random_aut(&mut common::rng(1000 + seed), &alphabet, 6, 0.5);
        let reduced = aut.reduce();

        assert!(reduced.state_count() <= aut.state_count());
        assert_eq!(reduced.reduce().state_count(), reduced.state_count(), "seed {}", seed);
        assert_eq!(aut.count_trees(4), reduced.count_trees(4), "seed {}", seed);
        for t in &trees {
            assert_eq!(aut.accepts(t), reduced.accepts(t), "seed {}: {}", seed, t.display(&alphabet));
        }

        let params = InclusionParams::default();
        assert!(check_inclusion(&aut, &reduced, &params));
        assert!(check_inclusion(&reduced, &aut, &params));
    }
}

#[test]
fn test_mutual_inclusion_means_equal_samples() {
    let (alphabet, _) = common::alphabet();
    let trees = Tree::enumerate(&alphabet, 3);
    let params = InclusionParams::default();
    let mut equal_pairs = 0;
    for seed in 0..SEEDS {
        let mut rng = common::rng(2000 + seed);
        let left = common::random_aut(&mut rng, &alphabet, 3, 0.7);
        let right = common::random_aut(&mut rng, &alphabet, 3, 0.7);
        let candidates = [(left.clone(), right.clone()), (left.clone(), left.reduce())];
        for (x, y) in &candidates {
            if check_inclusion(x, y, &params) && check_inclusion(y, x, &params) {
                equal_pairs += 1;
                let lx: HashSet<&Tree> = trees.iter().filter(|t| x.accepts(t)).collect();
                let ly: HashSet<&Tree> = trees.iter().filter(|t| y.accepts(t)).collect();
                assert_eq!(lx, ly, "seed {}", seed);
            }
        }
    }
    assert!(equal_pairs >= SEEDS);
}

#[test]
fn test_simulations_are_preorders() {
    let (alphabet, _) = common::alphabet();
    for seed in 0..SEEDS {
        let aut = common::random_aut(&mut common::rng(3000 + seed), &alphabet, 6, 0.6);
        let down = compute_downward_simulation(&aut);
        assert!(down.is_preorder(), "seed {}", seed);
        let up = compute_upward_simulation(&aut, &down);
        assert!(up.is_preorder(), "seed {}", seed);

        // Downward simulation implies language inclusion on sampled trees.
        let trees = Tree::enumerate(&alphabet, 3);
        for (p, q) in down.pairs() {
            for t in &trees {
                if aut.run(t).contains_state(p) {
                    assert!(aut.run(t).contains_state(q), "seed {}: {} <= {}", seed, p, q);
                }
            }
        }
    }
}
