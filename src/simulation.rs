//! Downward and upward simulation preorders.
//!
//! # Downward simulation
//!
//! `p ⪯↓ q` iff for every rule `f(p_1, ..., p_k) -> p` there is a rule
//! `f(q_1, ..., q_k) -> q` with `p_i ⪯↓ q_i` for all `i`. It implies
//! language inclusion `L(p) ⊆ L(q)`.
//!
//! # Upward simulation
//!
//! Upward simulation is parameterized by a *support* relation `D` on children
//! (normally the downward simulation). `p ⪯↑ q` iff
//!
//! - `p` is a root implies `q` is a root, and
//! - for every rule `f(p_1, ..., p_k) -> p'` with `p_i = p` there is a rule
//!   `f(q_1, ..., q_k) -> q'` with `q_i = q`, `p' ⪯↑ q'`, and `p_j D q_j`
//!   for all `j != i`.
//!
//! It relates the *contexts* in which two states may occur.
//!
//! # Algorithm
//!
//! Both relations are greatest fixed points. We start from a coarse
//! over-approximation and keep a worklist of pairs that may violate the
//! defining condition. Removing a pair can only invalidate pairs that depend
//! on it through a shared rule shape, and only those are re-queued. The
//! relation shrinks monotonically, so at most `|S|^2` pairs are ever removed.
//!
//! Simulations between states of two automata are obtained by running the
//! computation on their [`disjoint_union`][crate::automaton::TreeAut::disjoint_union].

use log::debug;

use crate::automaton::{Rule, RuleIndex, TreeAut};
use crate::bitset::BitSet;
use crate::relation::{BitMatrix, Relation};

/// Pairs waiting to be (re)checked, with O(1) membership.
struct Worklist {
    stack: Vec<(usize, usize)>,
    queued: Vec<BitSet>,
}

impl Worklist {
    fn new(size: usize) -> Self {
        Self {
            stack: Vec::new(),
            queued: vec![BitSet::new(size); size],
        }
    }

    fn push(&mut self, p: usize, q: usize) {
        if self.queued[p].insert(q) {
            self.stack.push((p, q));
        }
    }

    fn pop(&mut self) -> Option<(usize, usize)> {
        let (p, q) = self.stack.pop()?;
        self.queued[p].remove(q);
        Some((p, q))
    }
}

/// Computes the maximal downward simulation of `aut`.
pub fn compute_downward_simulation(aut: &TreeAut) -> Relation {
    let n = aut.state_count();
    let rules: Vec<&Rule> = aut.rules().collect();
    let index = aut.index();

    // Symbols each state can be produced by; q must offer at least those of p.
    let mut produced_by: Vec<BitSet> = vec![BitSet::default(); n];
    for rule in &rules {
        produced_by[rule.parent.index()].insert(rule.symbol.index());
    }

    let mut relation = BitMatrix::full(n);
    let mut worklist = Worklist::new(n);
    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if produced_by[p].is_subset(&produced_by[q]) {
                worklist.push(p, q);
            } else {
                relation.remove(p, q);
            }
        }
    }

    let mut removed = 0usize;
    while let Some((p, q)) = worklist.pop() {
        if !relation.contains(p, q) || downward_holds(&rules, &index, &relation, p, q) {
            continue;
        }
        debug!("downward: drop s{} <= s{}", p, q);
        relation.remove(p, q);
        removed += 1;

        // Pairs of parents whose rules place p and q in the same slot.
        for &(r1, i) in &index.occurrences[p] {
            for &(r2, j) in &index.occurrences[q] {
                if i != j || rules[r1].symbol != rules[r2].symbol {
                    continue;
                }
                let (pp, qq) = (rules[r1].parent.index(), rules[r2].parent.index());
                if relation.contains(pp, qq) {
                    worklist.push(pp, qq);
                }
            }
        }
    }

    let relation = relation.freeze();
    debug!(
        "compute_downward_simulation: {} states, {} pairs ({} removed by refinement)",
        n,
        relation.len(),
        removed
    );
    relation
}

fn downward_holds(rules: &[&Rule], index: &RuleIndex, relation: &BitMatrix, p: usize, q: usize) -> bool {
    index.by_parent[p].iter().all(|&r1| {
        let r1 = rules[r1];
        index.by_parent[q].iter().any(|&r2| {
            let r2 = rules[r2];
            r1.symbol == r2.symbol
                && r1.arity() == r2.arity()
                && r1
                    .children
                    .iter()
                    .zip(&r2.children)
                    .all(|(a, b)| relation.contains(a.index(), b.index()))
        })
    })
}

/// Computes the maximal upward simulation of `aut` induced by `support`.
///
/// # Panics
///
/// Panics if `support` is not defined over the states of `aut`.
pub fn compute_upward_simulation(aut: &TreeAut, support: &Relation) -> Relation {
    let n = aut.state_count();
    assert_eq!(support.size(), n, "Support relation must range over the automaton states");

    let rules: Vec<&Rule> = aut.rules().collect();
    let index = aut.index();

    let mut relation = BitMatrix::full(n);
    let mut worklist = Worklist::new(n);
    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if aut.root_set().contains(p) && !aut.root_set().contains(q) {
                relation.remove(p, q);
            } else {
                worklist.push(p, q);
            }
        }
    }

    let mut removed = 0usize;
    while let Some((p, q)) = worklist.pop() {
        if !relation.contains(p, q) || upward_holds(&rules, &index, support, &relation, p, q) {
            continue;
        }
        debug!("upward: drop s{} <= s{}", p, q);
        relation.remove(p, q);
        removed += 1;

        // Children sharing a slot under rules with parents p and q.
        for &r1 in &index.by_parent[p] {
            for &r2 in &index.by_parent[q] {
                let (r1, r2) = (rules[r1], rules[r2]);
                if r1.symbol != r2.symbol || r1.arity() != r2.arity() {
                    continue;
                }
                for (a, b) in r1.children.iter().zip(&r2.children) {
                    if relation.contains(a.index(), b.index()) {
                        worklist.push(a.index(), b.index());
                    }
                }
            }
        }
    }

    let relation = relation.freeze();
    debug!(
        "compute_upward_simulation: {} states, {} pairs ({} removed by refinement)",
        n,
        relation.len(),
        removed
    );
    relation
}

fn upward_holds(
    rules: &[&Rule],
    index: &RuleIndex,
    support: &Relation,
    relation: &BitMatrix,
    p: usize,
    q: usize,
) -> bool {
    index.occurrences[p].iter().all(|&(r1, i)| {
        let r1 = rules[r1];
        index.occurrences[q].iter().any(|&(r2, j)| {
            let r2 = rules[r2];
            i == j
                && r1.symbol == r2.symbol
                && r1.arity() == r2.arity()
                && relation.contains(r1.parent.index(), r2.parent.index())
                && r1
                    .children
                    .iter()
                    .zip(&r2.children)
                    .enumerate()
                    .all(|(m, (a, b))| m == i || support.contains(*a, *b))
        })
    })
}
