//! Antichain-based language inclusion.
//!
//! [`check_inclusion`] decides `L(smaller) ⊆ L(bigger)` for two automata
//! over the same [`Alphabet`][crate::alphabet::Alphabet].
//!
//! # Strategies
//!
//! - [`Direction::Upward`] explores pairs `(p, P)` bottom-up: some tree
//!   reaches the state `p` of the smaller automaton and exactly the states
//!   `P` of the bigger one. A pair with `p` a root and no root in `P` is a
//!   counterexample. See [`upward`].
//! - [`Direction::Downward`] explores obligations `L(p) ⊆ L(P)` top-down from
//!   the roots and computes which of them are refuted. See [`downward`].
//!
//! Both keep their frontier minimal: elements subsumed by a known one are
//! discarded. Subsumption is plain set inclusion, or the simulation matching
//! the direction when [`InclusionParams::use_simulation`] is set.
//!
//! # Example
//!
//! ```
//! use ta_rs::alphabet::Alphabet;
//! use ta_rs::automaton::TreeAut;
//! use ta_rs::inclusion::{check_inclusion, Direction, InclusionParams};
//!
//! let mut alphabet = Alphabet::new();
//! let a = alphabet.symbol("a", 0).unwrap();
//! let f = alphabet.symbol("f", 2).unwrap();
//!
//! // {f(a,a)}
//! let mut small = TreeAut::new();
//! let q = small.add_states(2);
//! small.add_rule(a, vec![], q[0]).unwrap();
//! small.add_rule(f, vec![q[0], q[0]], q[1]).unwrap();
//! small.mark_root(q[1]).unwrap();
//!
//! // {a, f(a,a)}
//! let mut big = small.clone();
//! big.mark_root(q[0]).unwrap();
//!
//! for direction in [Direction::Upward, Direction::Downward] {
//!     let params = InclusionParams::default().with_direction(direction);
//!     assert!(check_inclusion(&small, &big, &params));
//!     assert!(!check_inclusion(&big, &small, &params));
//! }
//! ```

pub mod downward;
pub mod upward;

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::automaton::TreeAut;

/// Inclusion algorithm family.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Algorithm {
    #[default]
    Antichains,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Bottom-up, from the leaves towards the roots.
    #[default]
    Upward,
    /// Top-down, from the roots towards the leaves.
    Downward,
}

/// Order in which pending elements are taken from the frontier.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum SearchOrder {
    #[default]
    Depth,
    Breadth,
}

/// Knobs of [`check_inclusion`]. None of them changes the verdict.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct InclusionParams {
    pub algorithm: Algorithm,
    pub direction: Direction,
    pub search_order: SearchOrder,
    /// Forces last-in first-out processing, as a recursive search would do.
    /// The search itself always runs on an explicit worklist.
    pub use_recursion: bool,
    /// Memoizes the rule tuples consulted by the downward strategy.
    pub use_downward_cache: bool,
    /// Prunes with simulation instead of plain set inclusion.
    pub use_simulation: bool,
}

impl InclusionParams {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_search_order(mut self, search_order: SearchOrder) -> Self {
        self.search_order = search_order;
        self
    }

    pub fn with_recursion(mut self, use_recursion: bool) -> Self {
        self.use_recursion = use_recursion;
        self
    }

    pub fn with_downward_cache(mut self, use_downward_cache: bool) -> Self {
        self.use_downward_cache = use_downward_cache;
        self
    }

    pub fn with_simulation(mut self, use_simulation: bool) -> Self {
        self.use_simulation = use_simulation;
        self
    }

    /// Effective frontier discipline.
    fn lifo(&self) -> bool {
        self.use_recursion || self.search_order == SearchOrder::Depth
    }
}

/// Counters collected during one inclusion check.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct InclusionStats {
    /// Elements taken from the frontier and expanded.
    pub explored: usize,
    /// New elements discarded because a known one subsumes them.
    pub pruned: usize,
    /// Known elements dropped because a new one subsumes them.
    pub removed: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl fmt::Display for InclusionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "explored {}, pruned {}, removed {}, cache {}/{}",
            self.explored,
            self.pruned,
            self.removed,
            self.cache_hits,
            self.cache_hits + self.cache_misses
        )
    }
}

/// Returns true iff every tree accepted by `smaller` is accepted by `bigger`.
pub fn check_inclusion(smaller: &TreeAut, bigger: &TreeAut, params: &InclusionParams) -> bool {
    check_inclusion_with_stats(smaller, bigger, params).0
}

/// Like [`check_inclusion`], also reporting search statistics.
pub fn check_inclusion_with_stats(
    smaller: &TreeAut,
    bigger: &TreeAut,
    params: &InclusionParams,
) -> (bool, InclusionStats) {
    let (result, stats) = match (params.algorithm, params.direction) {
        (Algorithm::Antichains, Direction::Upward) => upward::check(smaller, bigger, params),
        (Algorithm::Antichains, Direction::Downward) => downward::check(smaller, bigger, params),
    };
    debug!(
        "check_inclusion({:?}, {:?}): {} ({})",
        params.algorithm, params.direction, result, stats
    );
    (result, stats)
}

/// Frontier of pending element ids.
struct Frontier {
    queue: VecDeque<usize>,
    lifo: bool,
}

impl Frontier {
    fn new(params: &InclusionParams) -> Self {
        Self {
            queue: VecDeque::new(),
            lifo: params.lifo(),
        }
    }

    fn push(&mut self, id: usize) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<usize> {
        if self.lifo {
            self.queue.pop_back()
        } else {
            self.queue.pop_front()
        }
    }
}
