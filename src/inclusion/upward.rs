//! Bottom-up antichain inclusion.
//!
//! An element `(p, P)` records that some tree reaches the state `p` of the
//! smaller automaton while the bigger one reaches exactly the states `P` on
//! the same tree. Leaves seed the search; every rule of the smaller
//! automaton combines already processed elements into new ones. Inclusion
//! fails as soon as an element with `p` a root and no root in `P` appears.
//!
//! # Subsumption
//!
//! `(p, P)` is subsumed by `(p', P')` when `p ⪯ p'` and every state of `P'`
//! is below some state of `P`. Any counterexample built on the first
//! element can then be rebuilt on the second, so only minimal elements are
//! kept. The order `⪯` is the identity, or with
//! [`use_simulation`][super::InclusionParams::use_simulation] the upward
//! simulation of the disjoint union induced by the identity relation.

use log::debug;

use super::{Frontier, InclusionParams, InclusionStats};
use crate::automaton::{Rule, TreeAut};
use crate::bitset::BitSet;
use crate::relation::Relation;
use crate::simulation::compute_upward_simulation;

struct Element {
    state: usize,
    set: BitSet,
    alive: bool,
    processed: bool,
}

struct Search<'a> {
    smaller: &'a TreeAut,
    bigger: &'a TreeAut,
    rules: Vec<&'a Rule>,
    /// Preorder on the states of `smaller`.
    order_small: Relation,
    /// Preorder on the states of `bigger`.
    order_big: Relation,
    elements: Vec<Element>,
    /// Alive element ids per state of `smaller`.
    by_state: Vec<Vec<usize>>,
    frontier: Frontier,
    stats: InclusionStats,
}

pub(super) fn check(smaller: &TreeAut, bigger: &TreeAut, params: &InclusionParams) -> (bool, InclusionStats) {
    let (order_small, order_big) = if params.use_simulation {
        let (union, offset) = smaller.disjoint_union(bigger);
        let upward = compute_upward_simulation(&union, &Relation::identity(union.state_count()));
        let offset = offset as usize;
        (upward.restrict(0, offset), upward.restrict(offset, bigger.state_count()))
    } else {
        (
            Relation::identity(smaller.state_count()),
            Relation::identity(bigger.state_count()),
        )
    };

    let mut search = Search {
        smaller,
        bigger,
        rules: smaller.rules().collect(),
        order_small,
        order_big,
        elements: Vec::new(),
        by_state: vec![Vec::new(); smaller.state_count()],
        frontier: Frontier::new(params),
        stats: InclusionStats::default(),
    };
    let result = search.run();
    (result, search.stats)
}

impl Search<'_> {
    fn run(&mut self) -> bool {
        // Leaves.
        for i in 0..self.rules.len() {
            let rule = self.rules[i];
            if rule.arity() == 0 {
                let set = self.bigger.post(rule.symbol, &[]);
                if !self.offer(rule.parent.index(), set) {
                    return false;
                }
            }
        }

        let index = self.smaller.index();
        while let Some(id) = self.frontier.pop() {
            if !self.elements[id].alive {
                continue;
            }
            self.elements[id].processed = true;
            self.stats.explored += 1;

            let state = self.elements[id].state;
            for &(rule_idx, pos) in &index.occurrences[state] {
                let rule = self.rules[rule_idx];
                for combination in self.combinations(rule, pos, id) {
                    if !self.elements[id].alive {
                        break;
                    }
                    let children: Vec<BitSet> = combination.iter().map(|&e| self.elements[e].set.clone()).collect();
                    let set = self.bigger.post(rule.symbol, &children);
                    if !self.offer(rule.parent.index(), set) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Element tuples for `rule` with `pinned` at position `pos` and
    /// processed elements of the matching states elsewhere.
    fn combinations(&self, rule: &Rule, pos: usize, pinned: usize) -> Vec<Vec<usize>> {
        let candidates: Vec<Vec<usize>> = rule
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                if i == pos {
                    vec![pinned]
                } else {
                    self.by_state[child.index()]
                        .iter()
                        .copied()
                        .filter(|&e| self.elements[e].processed)
                        .collect()
                }
            })
            .collect();
        if candidates.iter().any(Vec::is_empty) {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut cursor = vec![0usize; candidates.len()];
        loop {
            result.push(cursor.iter().zip(&candidates).map(|(&c, list)| list[c]).collect());
            let mut i = 0;
            while i < cursor.len() {
                cursor[i] += 1;
                if cursor[i] < candidates[i].len() {
                    break;
                }
                cursor[i] = 0;
                i += 1;
            }
            if i == cursor.len() {
                break;
            }
        }
        result
    }

    /// Adds `(state, set)` unless subsumed. Returns false on a counterexample.
    fn offer(&mut self, state: usize, set: BitSet) -> bool {
        if self.smaller.root_set().contains(state) && !set.intersects(self.bigger.root_set()) {
            debug!("upward: counterexample at s{} with {} bigger states", state, set.len());
            return false;
        }

        let subsumed = self.order_small.upper(state.into()).iter().any(|upper| {
            self.by_state[upper]
                .iter()
                .any(|&e| self.order_big.is_covered(&self.elements[e].set, &set))
        });
        if subsumed {
            self.stats.pruned += 1;
            return true;
        }

        for lower in 0..self.by_state.len() {
            if !self.order_small.contains(lower.into(), state.into()) {
                continue;
            }
            let elements = &mut self.elements;
            let order_big = &self.order_big;
            let before = self.by_state[lower].len();
            self.by_state[lower].retain(|&e| {
                let keep = !order_big.is_covered(&set, &elements[e].set);
                if !keep {
                    elements[e].alive = false;
                }
                keep
            });
            self.stats.removed += before - self.by_state[lower].len();
        }

        let id = self.elements.len();
        self.elements.push(Element {
            state,
            set,
            alive: true,
            processed: false,
        });
        self.by_state[state].push(id);
        self.frontier.push(id);
        true
    }
}
