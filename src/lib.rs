//! # ta-rs: Explicit Tree Automata in Rust
//!
//! **`ta-rs`** is a library for working with **nondeterministic bottom-up tree automata**
//! over finite ranked alphabets. It is designed for the kind of automata that show up in
//! regular model checking and program verification: small to medium explicit automata that
//! must be shrunk and compared many times.
//!
//! ## What is a tree automaton?
//!
//! A tree automaton reads a ranked tree such as `f(a, g(b))` from the leaves upwards.
//! Each rule `f(q1, q2) -> q` says that a node labeled `f` whose children were assigned
//! `q1` and `q2` may be assigned `q`. The tree is accepted if its top node can be assigned
//! a **root** state.
//!
//! ## Key Features
//!
//! - **Dense state arena**: states are small integers owned by one [`TreeAut`][crate::automaton::TreeAut];
//!   symbolic names live in a separate [`StateDict`][crate::dict::StateDict].
//! - **Simulation engine**: maximal downward and upward simulations computed by worklist refinement.
//! - **Reduction**: quotienting by downward-simulation equivalence after trimming useless states.
//! - **Antichain inclusion**: upward and downward strategies with configurable search order,
//!   simulation-based pruning and memoization.
//! - **Timbuk I/O**: read and write the usual text format.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ta_rs::alphabet::Alphabet;
//! use ta_rs::automaton::TreeAut;
//! use ta_rs::inclusion::{check_inclusion, InclusionParams};
//!
//! let mut alphabet = Alphabet::new();
//! let a = alphabet.symbol("a", 0).unwrap();
//! let f = alphabet.symbol("f", 2).unwrap();
//!
//! // 1. Build {f(a,a)}
//! let mut small = TreeAut::new();
//! let q0 = small.add_state();
//! let q1 = small.add_state();
//! small.add_rule(a, vec![], q0).unwrap();
//! small.add_rule(f, vec![q0, q0], q1).unwrap();
//! small.mark_root(q1).unwrap();
//!
//! // 2. Build all trees over {a, f}
//! let mut all = TreeAut::new();
//! let q = all.add_state();
//! all.add_rule(a, vec![], q).unwrap();
//! all.add_rule(f, vec![q, q], q).unwrap();
//! all.mark_root(q).unwrap();
//!
//! // 3. Compare the languages
//! let params = InclusionParams::default();
//! assert!(check_inclusion(&small, &all, &params));
//! assert!(!check_inclusion(&all, &small, &params));
//!
//! // 4. Reduction never changes the language
//! assert_eq!(all.reduce().state_count(), 1);
//! ```
//!
//! ## Core Components
//!
//! - **[`automaton`]**: The [`TreeAut`][crate::automaton::TreeAut] model, runs and trimming.
//! - **[`simulation`]**: Downward and upward simulation preorders.
//! - **[`reduce`]**: Simulation-based state reduction.
//! - **[`inclusion`]**: Antichain-based language inclusion.
//! - **[`timbuk`]** and **[`commands`]**: Text front end.
//! - **[`dot`]**: Visualization using Graphviz.

pub mod alphabet;
pub mod automaton;
pub mod bitset;
pub mod cache;
pub mod commands;
pub mod count;
pub mod dict;
pub mod dot;
pub mod error;
pub mod inclusion;
pub mod reduce;
pub mod relation;
pub mod simulation;
pub mod timbuk;
pub mod tree;
pub mod types;
