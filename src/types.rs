//! Type-safe wrappers for automaton states and alphabet symbols.
//!
//! Both are dense indices into per-automaton (resp. per-alphabet) tables.
//! Keeping them as distinct newtypes prevents passing a symbol where a
//! state is expected, which is an easy mistake when both are plain `u32`s.
use std::fmt;

/// A state identifier (0-indexed).
///
/// States are allocated densely by [`TreeAut::add_state`][crate::automaton::TreeAut::add_state].
///
/// # Invariants
///
/// - A state is only meaningful for the automaton that produced it
/// - Identifiers of one automaton are exactly `0..state_count()`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct State(u32);

impl State {
    /// Creates a state with the given raw index.
    pub const fn new(index: u32) -> Self {
        State(index)
    }

    /// Returns the raw identifier as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a `usize`, for indexing tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the state shifted by `offset`.
    ///
    /// Used when placing the states of two automata side by side.
    pub const fn shifted(self, offset: u32) -> Self {
        State(self.0 + offset)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<State> for usize {
    fn from(state: State) -> Self {
        state.index()
    }
}

impl From<usize> for State {
    fn from(index: usize) -> Self {
        State(index as u32)
    }
}

/// A symbol of a ranked alphabet (0-indexed).
///
/// The arity of a symbol lives in the [`Alphabet`][crate::alphabet::Alphabet]
/// that issued it; two automata can only be compared when they share one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol with the given raw index.
    pub const fn new(index: u32) -> Self {
        Symbol(index)
    }

    /// Returns the raw identifier as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<Symbol> for usize {
    fn from(symbol: Symbol) -> Self {
        symbol.index()
    }
}
