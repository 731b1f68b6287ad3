//! Simulation-based state reduction.
//!
//! The automaton is first stripped of useless states, then states that
//! downward-simulate each other (`p ⪯↓ q` and `q ⪯↓ p`, hence `L(p) = L(q)`)
//! are merged into one. The quotient accepts exactly the same trees.
//!
//! ```
//! use ta_rs::alphabet::Alphabet;
//! use ta_rs::automaton::TreeAut;
//!
//! let mut alphabet = Alphabet::new();
//! let a = alphabet.symbol("a", 0).unwrap();
//! let f = alphabet.symbol("f", 2).unwrap();
//!
//! let mut aut = TreeAut::new();
//! let q = aut.add_states(3);
//! aut.add_rule(a, vec![], q[0]).unwrap();
//! aut.add_rule(a, vec![], q[1]).unwrap(); // same language as q[0]
//! aut.add_rule(f, vec![q[0], q[1]], q[2]).unwrap();
//! aut.mark_root(q[2]).unwrap();
//!
//! let reduced = aut.reduce();
//! assert_eq!(reduced.state_count(), 2);
//! assert_eq!(reduced.rule_count(), 2);
//! ```

use log::debug;

use crate::automaton::{StateMap, TreeAut};
use crate::simulation::compute_downward_simulation;
use crate::types::State;

impl TreeAut {
    /// Returns a language-equivalent automaton with at most as many states.
    pub fn reduce(&self) -> TreeAut {
        self.reduce_with_map().0
    }

    /// Like [`TreeAut::reduce`], also returning the image of every original state.
    ///
    /// Useless states map to `None`; states of one equivalence class share their image.
    pub fn reduce_with_map(&self) -> (TreeAut, StateMap) {
        let (trimmed, trim_map) = self.remove_useless_with_map();
        let (quotient, quotient_map) = trimmed.quotient_by_downward_simulation();

        let map: StateMap = trim_map
            .iter()
            .map(|image| image.and_then(|s| quotient_map[s.index()]))
            .collect();
        debug!(
            "reduce: {} -> {} states, {} -> {} rules",
            self.state_count(),
            quotient.state_count(),
            self.rule_count(),
            quotient.rule_count()
        );
        (quotient, map)
    }

    /// Merges the classes of downward-simulation equivalence.
    fn quotient_by_downward_simulation(&self) -> (TreeAut, StateMap) {
        let simulation = compute_downward_simulation(self);
        let (classes, count) = simulation.equivalence_classes();
        debug!(
            "quotient: {} classes over {} states",
            count,
            self.state_count()
        );
        let map: StateMap = classes.into_iter().map(|c| Some(State::from(c))).collect();
        (self.map_states(&map, count), map)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::Symbol;

    const A: Symbol = Symbol::new(0);
    const F: Symbol = Symbol::new(1);

    #[test]
    fn test_reduce_merges_equivalent_states() {
        let mut aut = TreeAut::new();
        let q = aut.add_states(4);
        aut.add_rule(A, vec![], q[0]).unwrap();
        aut.add_rule(A, vec![], q[1]).unwrap();
        aut.add_rule(F, vec![q[0], q[1]], q[2]).unwrap();
        aut.add_rule(F, vec![q[1], q[0]], q[3]).unwrap();
        aut.mark_root(q[2]).unwrap();
        aut.mark_root(q[3]).unwrap();

        let (reduced, map) = aut.reduce_with_map();
        assert_eq!(reduced.state_count(), 2);
        assert_eq!(reduced.rule_count(), 2);
        assert_eq!(map[0], map[1]);
        assert_eq!(map[2], map[3]);
        assert_ne!(map[0], map[2]);
        assert!(reduced.is_root(map[2].unwrap()));
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let mut aut = TreeAut::new();
        let q = aut.add_states(3);
        aut.add_rule(A, vec![], q[0]).unwrap();
        aut.add_rule(A, vec![], q[1]).unwrap();
        aut.add_rule(F, vec![q[0], q[2]], q[2]).unwrap();
        aut.add_rule(F, vec![q[1], q[1]], q[2]).unwrap();
        aut.mark_root(q[2]).unwrap();

        let once = aut.reduce();
        let twice = once.reduce();
        assert_eq!(once.state_count(), 2);
        assert_eq!(twice.state_count(), once.state_count());
        assert_eq!(twice.rule_count(), once.rule_count());
    }

    #[test]
    fn test_reduce_empty_language() {
        let mut aut = TreeAut::new();
        let q = aut.add_state();
        aut.add_rule(F, vec![q, q], q).unwrap();
        aut.mark_root(q).unwrap();
        let reduced = aut.reduce();
        assert_eq!(reduced.state_count(), 0);
        assert!(reduced.is_lang_empty());
    }
}
