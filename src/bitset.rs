//! Growable bit set used for sets of states.
//!
//! Macro-states of the inclusion checker, root sets and the rows of a
//! [`Relation`][crate::relation::Relation] are all `BitSet`s. Equality and
//! hashing ignore trailing zero words, so two sets holding the same elements
//! compare equal regardless of how far either of them has grown.

use std::hash::{Hash, Hasher};

use crate::types::State;

/// A bit set backed by a vector of u64 words.
///
/// Each bit corresponds to a dense index. The set grows on demand when
/// inserting beyond the current capacity.
#[derive(Debug, Clone, Default)]
pub struct BitSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl BitSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty bit set with room for `capacity` bits.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(Self::BITS_PER_WORD)],
            count: 0,
        }
    }

    /// Creates a bit set with the first `size` bits set.
    pub fn full(size: usize) -> Self {
        let mut words = vec![u64::MAX; size / Self::BITS_PER_WORD];
        let rest = size % Self::BITS_PER_WORD;
        if rest > 0 {
            words.push((1u64 << rest) - 1);
        }
        Self { words, count: size }
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns true if the bit at the given index is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (w, b) = Self::word_and_bit(index);
        w < self.words.len() && (self.words[w] >> b) & 1 == 1
    }

    /// Returns true if the set contains the state.
    #[inline]
    pub fn contains_state(&self, state: State) -> bool {
        self.contains(state.index())
    }

    /// Sets the bit at the given index. Returns true if the bit was not previously set.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (w, b) = Self::word_and_bit(index);
        if w >= self.words.len() {
            self.words.resize(w + 1, 0);
        }
        let mask = 1u64 << b;
        let was_clear = self.words[w] & mask == 0;
        if was_clear {
            self.words[w] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Clears the bit at the given index. Returns true if the bit was previously set.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let (w, b) = Self::word_and_bit(index);
        if w >= self.words.len() {
            return false;
        }
        let mask = 1u64 << b;
        let was_set = self.words[w] & mask != 0;
        if was_set {
            self.words[w] &= !mask;
            self.count -= 1;
        }
        was_set
    }

    /// Returns true if every element of `self` is also in `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        if self.count > other.count {
            return false;
        }
        self.words
            .iter()
            .enumerate()
            .all(|(i, &w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    /// Returns true if the two sets share at least one element.
    pub fn intersects(&self, other: &BitSet) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Returns an iterator over all set bit indices, in increasing order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            words: &self.words,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Returns an iterator over the elements as states.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.iter().map(State::from)
    }

    /// Significant words, without trailing zeros.
    fn trimmed(&self) -> &[u64] {
        let end = self.words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        &self.words[..end]
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.trimmed() == other.trimmed()
    }
}

impl Eq for BitSet {}

impl Hash for BitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trimmed().hash(state);
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = BitSet::default();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

/// Iterator over set bits in a BitSet.
pub struct BitSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * BitSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current_word = self.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_empty() {
        let bs = BitSet::default();
        assert!(bs.is_empty());
        assert_eq!(bs.len(), 0);
        assert!(!bs.contains(0));
        assert!(!bs.contains(100));
        assert_eq!(bs.iter().next(), None);
    }

    #[test]
    fn test_insert_remove() {
        let mut bs = BitSet::new(10);
        assert!(bs.insert(42));
        assert!(!bs.insert(42));
        assert!(bs.contains(42));
        assert_eq!(bs.len(), 1);
        assert!(bs.remove(42));
        assert!(!bs.remove(42));
        assert!(bs.is_empty());
    }

    #[test]
    fn test_full() {
        let bs = BitSet::full(70);
        assert_eq!(bs.len(), 70);
        assert!(bs.contains(0));
        assert!(bs.contains(69));
        assert!(!bs.contains(70));
        assert_eq!(BitSet::full(0), BitSet::default());
    }

    #[test]
    fn test_iter() {
        let bs: BitSet = [5, 10, 3, 64, 65].into_iter().collect();
        let indices: Vec<_> = bs.iter().collect();
        assert_eq!(indices, vec![3, 5, 10, 64, 65]);
    }

    #[test]
    fn test_subset_and_intersects() {
        let a: BitSet = [1, 2].into_iter().collect();
        let b: BitSet = [1, 2, 130].into_iter().collect();
        let c: BitSet = [3].into_iter().collect();
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(BitSet::default().is_subset(&a));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_eq_ignores_capacity() {
        let mut a = BitSet::new(1000);
        a.insert(7);
        let mut b = BitSet::default();
        b.insert(7);
        b.insert(500);
        b.remove(500);
        assert_eq!(a, b);

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }
}
