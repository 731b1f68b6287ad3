#![allow(dead_code)]

use std::collections::HashSet;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use ta_rs::alphabet::Alphabet;
use ta_rs::automaton::TreeAut;
use ta_rs::bitset::BitSet;
use ta_rs::inclusion::{Direction, InclusionParams, SearchOrder};
use ta_rs::types::Symbol;

/// Alphabet {a/0, b/0, g/1, f/2}.
pub fn alphabet() -> (Alphabet, Vec<Symbol>) {
    let mut alphabet = Alphabet::new();
    let symbols = vec![
        alphabet.symbol("a", 0).unwrap(),
        alphabet.symbol("b", 0).unwrap(),
        alphabet.symbol("g", 1).unwrap(),
        alphabet.symbol("f", 2).unwrap(),
    ];
    (alphabet, symbols)
}

/// A random automaton with `states` states and about `density * states` rules per symbol.
pub fn random_aut(rng: &mut ChaCha8Rng, alphabet: &Alphabet, states: usize, density: f64) -> TreeAut {
    let mut aut = TreeAut::new();
    let q = aut.add_states(states);
    for symbol in alphabet.symbols() {
        let arity = alphabet.arity(symbol);
        let count = ((states as f64) * density).round() as usize;
        for _ in 0..count.max(1) {
            let children = (0..arity).map(|_| q[rng.random_range(0..states)]).collect();
            let parent = q[rng.random_range(0..states)];
            aut.add_rule(symbol, children, parent).unwrap();
        }
    }
    for &s in &q {
        if rng.random_bool(0.3) {
            aut.mark_root(s).unwrap();
        }
    }
    aut
}

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Every combination of inclusion knobs.
pub fn all_params() -> Vec<InclusionParams> {
    let mut result = Vec::new();
    for direction in [Direction::Upward, Direction::Downward] {
        for search_order in [SearchOrder::Depth, SearchOrder::Breadth] {
            for flags in 0..8u8 {
                result.push(
                    InclusionParams::default()
                        .with_direction(direction)
                        .with_search_order(search_order)
                        .with_recursion(flags & 1 != 0)
                        .with_downward_cache(flags & 2 != 0)
                        .with_simulation(flags & 4 != 0),
                );
            }
        }
    }
    result
}

/// Decides `L(smaller) ⊆ L(bigger)` without antichains: saturates every pair
/// `(p, P)` such that some tree reaches `p` in `smaller` and exactly `P` in
/// `bigger`, then looks for a root `p` whose `P` holds no root.
pub fn included_by_saturation(smaller: &TreeAut, bigger: &TreeAut) -> bool {
    let mut pairs: HashSet<(usize, BitSet)> = HashSet::new();
    loop {
        let mut fresh = Vec::new();
        for rule in smaller.rules() {
            let options: Vec<Vec<BitSet>> = rule
                .children
                .iter()
                .map(|c| pairs.iter().filter(|(p, _)| *p == c.index()).map(|(_, set)| set.clone()).collect())
                .collect();
            let mut combos: Vec<Vec<BitSet>> = vec![Vec::new()];
            for option in &options {
                combos = combos
                    .iter()
                    .flat_map(|prefix| {
                        option.iter().map(move |set| {
                            let mut next = prefix.clone();
                            next.push(set.clone());
                            next
                        })
                    })
                    .collect();
            }
            for combo in combos {
                let pair = (rule.parent.index(), bigger.post(rule.symbol, &combo));
                if !pairs.contains(&pair) {
                    fresh.push(pair);
                }
            }
        }
        if fresh.is_empty() {
            break;
        }
        pairs.extend(fresh);
    }
    !pairs
        .iter()
        .any(|(p, set)| smaller.root_set().contains(*p) && !set.intersects(bigger.root_set()))
}
