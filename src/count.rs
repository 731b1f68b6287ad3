//! Witness trees and language size.
//!
//! Bottom-up sweeps over an automaton: [`TreeAut::one_tree`] and
//! [`TreeAut::counterexample`] build trees of minimal height, and
//! [`TreeAut::count_trees`] counts accepted trees up to a height bound.

use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;

use crate::automaton::TreeAut;
use crate::bitset::BitSet;
use crate::tree::Tree;

impl TreeAut {
    /// Returns one accepted tree, if the language is not empty.
    ///
    /// Every state gets the first witness found in a bottom-up sweep, so the
    /// result has minimal height among the accepted trees.
    pub fn one_tree(&self) -> Option<Tree> {
        let mut witness: Vec<Option<Tree>> = vec![None; self.state_count()];
        loop {
            let mut found: Vec<(usize, Tree)> = Vec::new();
            for rule in self.rules() {
                if witness[rule.parent.index()].is_some() || found.iter().any(|(s, _)| *s == rule.parent.index()) {
                    continue;
                }
                let children: Option<Vec<Tree>> = rule.children.iter().map(|c| witness[c.index()].clone()).collect();
                if let Some(children) = children {
                    found.push((rule.parent.index(), Tree::node(rule.symbol, children)));
                }
            }
            if found.is_empty() {
                break;
            }
            for (state, tree) in found {
                witness[state] = Some(tree);
            }
        }
        self.roots().find_map(|r| witness[r.index()].clone())
    }

    /// Returns a tree accepted by `self` and rejected by `other`, if any.
    ///
    /// Saturates the pairs `(p, P)` where some tree reaches `p` in `self` and
    /// exactly `P` in `other`, one tree height per round, so the result has
    /// minimal height. The number of pairs is exponential in the states of
    /// `other`.
    pub fn counterexample(&self, other: &TreeAut) -> Option<Tree> {
        let mut seen: HashSet<(usize, BitSet)> = HashSet::new();
        let mut by_state: Vec<Vec<(BitSet, Tree)>> = vec![Vec::new(); self.state_count()];
        loop {
            let mut fresh: Vec<(usize, BitSet, Tree)> = Vec::new();
            for rule in self.rules() {
                let options: Vec<&[(BitSet, Tree)]> =
                    rule.children.iter().map(|c| by_state[c.index()].as_slice()).collect();
                if options.iter().any(|o| o.is_empty()) {
                    continue;
                }
                let mut choice = vec![0usize; options.len()];
                loop {
                    let sets: Vec<BitSet> = options.iter().zip(&choice).map(|(o, &i)| o[i].0.clone()).collect();
                    let reached = other.post(rule.symbol, &sets);
                    if seen.insert((rule.parent.index(), reached.clone())) {
                        let children = options.iter().zip(&choice).map(|(o, &i)| o[i].1.clone()).collect();
                        let tree = Tree::node(rule.symbol, children);
                        if self.is_root(rule.parent) && !reached.intersects(other.root_set()) {
                            return Some(tree);
                        }
                        fresh.push((rule.parent.index(), reached, tree));
                    }

                    let mut pos = 0;
                    while pos < choice.len() {
                        choice[pos] += 1;
                        if choice[pos] < options[pos].len() {
                            break;
                        }
                        choice[pos] = 0;
                        pos += 1;
                    }
                    if pos == choice.len() {
                        break;
                    }
                }
            }
            if fresh.is_empty() {
                return None;
            }
            for (state, reached, tree) in fresh {
                by_state[state].push((reached, tree));
            }
        }
    }

    /// Number of distinct accepted trees of height at most `max_height`.
    ///
    /// Trees are grouped by the exact set of states they reach, so each tree
    /// is counted once however many runs it has.
    pub fn count_trees(&self, max_height: usize) -> BigUint {
        // Trees of height <= h, keyed by their set of reached states.
        let mut classes: HashMap<BitSet, BigUint> = HashMap::new();
        for _ in 0..max_height {
            let entries: Vec<(&BitSet, &BigUint)> = classes.iter().collect();
            let mut next: HashMap<BitSet, BigUint> = HashMap::new();
            for symbol in self.symbols() {
                let k = self.arity(symbol).unwrap_or(0);
                if k > 0 && entries.is_empty() {
                    continue;
                }
                let mut tuple = vec![0usize; k];
                loop {
                    let children: Vec<BitSet> = tuple.iter().map(|&i| entries[i].0.clone()).collect();
                    let reached = self.post(symbol, &children);
                    if !reached.is_empty() {
                        let count = tuple.iter().fold(BigUint::from(1u32), |acc, &i| acc * entries[i].1);
                        *next.entry(reached).or_default() += count;
                    }

                    let mut pos = 0;
                    while pos < k {
                        tuple[pos] += 1;
                        if tuple[pos] < entries.len() {
                            break;
                        }
                        tuple[pos] = 0;
                        pos += 1;
                    }
                    if pos == k {
                        break;
                    }
                }
            }
            classes = next;
        }

        classes
            .iter()
            .filter(|(reached, _)| reached.intersects(self.root_set()))
            .map(|(_, count)| count)
            .sum()
    }
}
