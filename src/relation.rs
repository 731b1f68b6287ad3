//! Binary relations over the states of one automaton.
//!
//! Simulations are computed on a mutable [`BitMatrix`] (one [`BitSet`] row
//! per state) and handed out as an immutable [`Relation`] once the
//! refinement has reached its fixed point.
//!
//! `relation.contains(p, q)` reads as `p ⪯ q`: "`q` simulates `p`".

use std::fmt;

use crate::bitset::BitSet;
use crate::types::State;

/// Square boolean matrix under refinement.
#[derive(Debug, Clone)]
pub(crate) struct BitMatrix {
    size: usize,
    rows: Vec<BitSet>,
}

impl BitMatrix {
    /// The full relation `S × S`.
    pub(crate) fn full(size: usize) -> Self {
        Self {
            size,
            rows: vec![BitSet::full(size); size],
        }
    }

    #[inline]
    pub(crate) fn contains(&self, p: usize, q: usize) -> bool {
        self.rows[p].contains(q)
    }

    #[inline]
    pub(crate) fn remove(&mut self, p: usize, q: usize) -> bool {
        self.rows[p].remove(q)
    }

    pub(crate) fn freeze(self) -> Relation {
        Relation {
            size: self.size,
            rows: self.rows,
        }
    }
}

/// A frozen relation over `0..size()`.
#[derive(Clone, PartialEq, Eq)]
pub struct Relation {
    size: usize,
    rows: Vec<BitSet>,
}

impl Relation {
    /// The identity relation over `size` states.
    pub fn identity(size: usize) -> Self {
        let rows = (0..size).map(|i| std::iter::once(i).collect()).collect();
        Self { size, rows }
    }

    /// Builds a relation from explicit pairs.
    pub fn from_pairs(size: usize, pairs: impl IntoIterator<Item = (State, State)>) -> Self {
        let mut rows = vec![BitSet::new(size); size];
        for (p, q) in pairs {
            assert!(p.index() < size && q.index() < size, "Pair ({}, {}) out of range", p, q);
            rows[p.index()].insert(q.index());
        }
        Self { size, rows }
    }

    /// Number of states the relation is defined over.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true iff `p ⪯ q`.
    #[inline]
    pub fn contains(&self, p: State, q: State) -> bool {
        assert!(p.index() < self.size, "State {} out of range", p);
        self.rows[p.index()].contains(q.index())
    }

    /// All states `q` with `p ⪯ q`.
    pub fn upper(&self, p: State) -> &BitSet {
        &self.rows[p.index()]
    }

    /// Number of related pairs.
    pub fn len(&self) -> usize {
        self.rows.iter().map(BitSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All related pairs, row by row.
    pub fn pairs(&self) -> impl Iterator<Item = (State, State)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(p, row)| row.iter().map(move |q| (State::from(p), State::from(q))))
    }

    pub fn is_reflexive(&self) -> bool {
        (0..self.size).all(|i| self.rows[i].contains(i))
    }

    pub fn is_transitive(&self) -> bool {
        // p ⪯ q implies upper(q) ⊆ upper(p).
        self.pairs()
            .all(|(p, q)| self.rows[q.index()].is_subset(&self.rows[p.index()]))
    }

    pub fn is_preorder(&self) -> bool {
        self.is_reflexive() && self.is_transitive()
    }

    /// `p ⪯ q` for every `p ∈ lhs` and some `q ∈ rhs` (the ∀∃ lifting to sets).
    pub fn is_covered(&self, lhs: &BitSet, rhs: &BitSet) -> bool {
        lhs.iter().all(|p| self.rows[p].intersects(rhs))
    }

    /// The sub-relation over `start..start + len`, renumbered from zero.
    ///
    /// Used to split a relation computed on a disjoint union back into its parts.
    pub fn restrict(&self, start: usize, len: usize) -> Relation {
        assert!(start + len <= self.size, "Range {}..{} out of bounds", start, start + len);
        let rows = self.rows[start..start + len]
            .iter()
            .map(|row| row.iter().filter(|&q| q >= start && q < start + len).map(|q| q - start).collect())
            .collect();
        Relation { size: len, rows }
    }

    /// Classes of the symmetric kernel `p ⪯ q ∧ q ⪯ p`.
    ///
    /// Returns the class index of every state and the number of classes.
    /// Classes are numbered in order of their smallest member.
    pub fn equivalence_classes(&self) -> (Vec<usize>, usize) {
        let mut class = vec![usize::MAX; self.size];
        let mut count = 0;
        for p in 0..self.size {
            if class[p] != usize::MAX {
                continue;
            }
            class[p] = count;
            for q in self.rows[p].iter() {
                if q > p && class[q] == usize::MAX && self.rows[q].contains(p) {
                    class[q] = count;
                }
            }
            count += 1;
        }
        (class, count)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.pairs().map(|(p, q)| (p.id(), q.id())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(i: u32) -> State {
        State::new(i)
    }

    #[test]
    fn test_identity() {
        let id = Relation::identity(3);
        assert_eq!(id.len(), 3);
        assert!(id.contains(s(1), s(1)));
        assert!(!id.contains(s(1), s(2)));
        assert!(id.is_preorder());
        assert_eq!(id.equivalence_classes(), (vec![0, 1, 2], 3));
    }

    #[test]
    fn test_bit_matrix_refinement() {
        let mut m = BitMatrix::full(2);
        assert!(m.contains(0, 1));
        assert!(m.remove(0, 1));
        assert!(!m.remove(0, 1));
        let r = m.freeze();
        assert_eq!(r.len(), 3);
        assert!(r.contains(s(1), s(0)));
        assert!(!r.contains(s(0), s(1)));
    }

    #[test]
    fn test_equivalence_classes() {
        // 0 ~ 2, 1 alone, 3 above everything.
        let mut pairs = vec![(s(0), s(2)), (s(2), s(0))];
        for i in 0..4 {
            pairs.push((s(i), s(i)));
            pairs.push((s(i), s(3)));
        }
        let r = Relation::from_pairs(4, pairs);
        assert!(r.is_preorder());
        assert_eq!(r.equivalence_classes(), (vec![0, 1, 0, 2], 3));
    }

    #[test]
    fn test_restrict() {
        let r = Relation::from_pairs(4, [(s(0), s(3)), (s(2), s(3)), (s(3), s(2)), (s(1), s(1))]);
        let tail = r.restrict(2, 2);
        assert_eq!(tail.size(), 2);
        assert_eq!(tail.len(), 2);
        assert!(tail.contains(s(0), s(1)));
        assert!(tail.contains(s(1), s(0)));
        let head = r.restrict(0, 2);
        assert_eq!(head.pairs().collect::<Vec<_>>(), vec![(s(1), s(1))]);
    }

    #[test]
    fn test_not_transitive() {
        let r = Relation::from_pairs(3, [(s(0), s(1)), (s(1), s(2))]);
        assert!(!r.is_transitive());
        assert!(!r.is_reflexive());
    }

    #[test]
    fn test_is_covered() {
        let r = Relation::from_pairs(3, [(s(0), s(0)), (s(0), s(2)), (s(1), s(1))]);
        let lhs: BitSet = [0, 1].into_iter().collect();
        assert!(r.is_covered(&lhs, &[1, 2].into_iter().collect()));
        assert!(!r.is_covered(&lhs, &[2].into_iter().collect()));
        assert!(r.is_covered(&BitSet::default(), &BitSet::default()));
    }
}
