//! Explicit bottom-up tree automata.
//!
//! A [`TreeAut`] owns a dense arena of states `0..state_count()`, a set of
//! transition rules `symbol(child_1, ..., child_k) -> parent`, and a set of
//! root (accepting) states. A tree is accepted iff some run labels its top
//! node with a root state.
//!
//! # Construction
//!
//! ```
//! use ta_rs::alphabet::Alphabet;
//! use ta_rs::automaton::TreeAut;
//! use ta_rs::tree::Tree;
//!
//! let mut alphabet = Alphabet::new();
//! let a = alphabet.symbol("a", 0).unwrap();
//! let f = alphabet.symbol("f", 2).unwrap();
//!
//! let mut aut = TreeAut::new();
//! let q0 = aut.add_state();
//! let q1 = aut.add_state();
//! aut.add_rule(a, vec![], q0).unwrap();
//! aut.add_rule(f, vec![q0, q0], q1).unwrap();
//! aut.mark_root(q1).unwrap();
//!
//! assert!(aut.accepts(&Tree::node(f, vec![Tree::leaf(a), Tree::leaf(a)])));
//! assert!(!aut.accepts(&Tree::leaf(a)));
//! ```
//!
//! # Invariants
//!
//! - Every state mentioned by a rule or the root set was allocated by
//!   [`TreeAut::add_state`] on the same instance ([`Error::UnknownState`] otherwise).
//! - All rules over one symbol have the same number of children
//!   ([`Error::ArityMismatch`] otherwise).
//! - No two rules are identical; adding an existing rule is a no-op.
//!
//! Transformations ([`TreeAut::remove_useless`], [`TreeAut::reduce`][crate::reduce])
//! never mutate the receiver: they build a fresh automaton.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;

use log::debug;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::tree::Tree;
use crate::types::{State, Symbol};

/// Mapping from the states of one automaton to the states of another.
///
/// `map[s.index()]` is the image of `s`, or `None` when `s` was dropped.
pub type StateMap = Vec<Option<State>>;

/// A bottom-up transition rule `symbol(children) -> parent`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Rule {
    pub symbol: Symbol,
    pub children: Vec<State>,
    pub parent: State,
}

impl Rule {
    pub fn new(symbol: Symbol, children: Vec<State>, parent: State) -> Self {
        Self {
            symbol,
            children,
            parent,
        }
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }
}

#[derive(Clone, Default)]
pub struct TreeAut {
    state_count: usize,
    rules: Vec<Rule>,
    seen: HashSet<Rule>,
    by_symbol: BTreeMap<Symbol, Vec<usize>>,
    arities: BTreeMap<Symbol, usize>,
    roots: BitSet,
}

impl Debug for TreeAut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeAut")
            .field("states", &self.state_count)
            .field("rules", &self.rules.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl TreeAut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh state.
    pub fn add_state(&mut self) -> State {
        let state = State::from(self.state_count);
        self.state_count += 1;
        state
    }

    /// Allocates `n` fresh states and returns them in order.
    pub fn add_states(&mut self, n: usize) -> Vec<State> {
        (0..n).map(|_| self.add_state()).collect()
    }

    fn check_state(&self, state: State) -> Result<()> {
        if state.index() < self.state_count {
            Ok(())
        } else {
            Err(Error::UnknownState(state))
        }
    }

    /// Inserts the rule `symbol(children) -> parent` unless it is already present.
    pub fn add_rule(&mut self, symbol: Symbol, children: Vec<State>, parent: State) -> Result<()> {
        for &s in children.iter().chain(std::iter::once(&parent)) {
            self.check_state(s)?;
        }
        if let Some(&expected) = self.arities.get(&symbol) {
            if expected != children.len() {
                return Err(Error::ArityMismatch {
                    symbol: symbol.to_string(),
                    expected,
                    found: children.len(),
                });
            }
        }
        self.insert_rule(Rule::new(symbol, children, parent));
        Ok(())
    }

    /// Inserts a rule whose states and arity are already known to be valid.
    fn insert_rule(&mut self, rule: Rule) {
        if self.seen.contains(&rule) {
            return;
        }
        self.arities.entry(rule.symbol).or_insert(rule.arity());
        self.by_symbol.entry(rule.symbol).or_default().push(self.rules.len());
        self.seen.insert(rule.clone());
        self.rules.push(rule);
    }

    /// Marks `state` as a root (accepting) state.
    pub fn mark_root(&mut self, state: State) -> Result<()> {
        self.check_state(state)?;
        self.roots.insert(state.index());
        Ok(())
    }

    pub fn is_root(&self, state: State) -> bool {
        self.roots.contains_state(state)
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// All states, in allocation order.
    pub fn states(&self) -> impl Iterator<Item = State> {
        (0..self.state_count).map(State::from)
    }

    pub fn roots(&self) -> impl Iterator<Item = State> + '_ {
        self.roots.states()
    }

    pub fn root_set(&self) -> &BitSet {
        &self.roots
    }

    /// All rules, in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Rules over `symbol`. The iterator can be recreated at will.
    pub fn rules_for(&self, symbol: Symbol) -> impl Iterator<Item = &Rule> {
        self.by_symbol
            .get(&symbol)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rules[i])
    }

    /// Symbols occurring in at least one rule, in increasing order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.by_symbol.keys().copied()
    }

    /// Arity of `symbol` as fixed by the rules, if the symbol occurs at all.
    pub fn arity(&self, symbol: Symbol) -> Option<usize> {
        self.arities.get(&symbol).copied()
    }

    /// Builds the per-state rule indices used by the relation engine.
    pub fn index(&self) -> RuleIndex {
        let n = self.state_count;
        let mut by_parent = vec![Vec::new(); n];
        let mut occurrences = vec![Vec::new(); n];
        for (i, rule) in self.rules.iter().enumerate() {
            by_parent[rule.parent.index()].push(i);
            for (pos, child) in rule.children.iter().enumerate() {
                occurrences[child.index()].push((i, pos));
            }
        }
        RuleIndex { by_parent, occurrences }
    }

    /// Bottom-up successor: the parents of all rules over `symbol` whose
    /// `i`-th child lies in `children[i]`.
    pub fn post(&self, symbol: Symbol, children: &[BitSet]) -> BitSet {
        let mut result = BitSet::new(self.state_count);
        for rule in self.rules_for(symbol) {
            if rule.arity() == children.len()
                && rule
                    .children
                    .iter()
                    .zip(children)
                    .all(|(c, set)| set.contains_state(*c))
            {
                result.insert(rule.parent.index());
            }
        }
        result
    }

    /// States reachable at the top of `tree`.
    pub fn run(&self, tree: &Tree) -> BitSet {
        // Post-order over an explicit stack, so deep trees cannot overflow.
        let mut stack: Vec<(&Tree, bool)> = vec![(tree, false)];
        let mut values: Vec<BitSet> = Vec::new();
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let k = node.children().len();
                let children = values.split_off(values.len() - k);
                values.push(self.post(node.symbol(), &children));
            } else {
                stack.push((node, true));
                for child in node.children().iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        values.pop().unwrap_or_default()
    }

    pub fn accepts(&self, tree: &Tree) -> bool {
        self.run(tree).intersects(&self.roots)
    }

    /// States with a non-empty downward language.
    pub fn productive_states(&self) -> BitSet {
        let mut productive = BitSet::new(self.state_count);
        let mut missing: Vec<usize> = self.rules.iter().map(|r| r.arity()).collect();
        let index = self.index();
        let mut queue: Vec<usize> = Vec::new();
        for rule in &self.rules {
            if rule.arity() == 0 && productive.insert(rule.parent.index()) {
                queue.push(rule.parent.index());
            }
        }
        while let Some(s) = queue.pop() {
            for &(rule_idx, _) in &index.occurrences[s] {
                missing[rule_idx] -= 1;
                if missing[rule_idx] == 0 {
                    let parent = self.rules[rule_idx].parent.index();
                    if productive.insert(parent) {
                        queue.push(parent);
                    }
                }
            }
        }
        productive
    }

    /// Returns true iff the automaton accepts no tree.
    pub fn is_lang_empty(&self) -> bool {
        !self.productive_states().intersects(&self.roots)
    }

    /// Drops states with an empty language and states that cannot occur in
    /// an accepting run, renumbering the survivors densely.
    pub fn remove_useless(&self) -> TreeAut {
        self.remove_useless_with_map().0
    }

    /// Like [`TreeAut::remove_useless`], also returning where every original state went.
    pub fn remove_useless_with_map(&self) -> (TreeAut, StateMap) {
        let productive = self.productive_states();
        let index = self.index();

        // Top-down reachability from the roots through rules that are fully productive.
        let mut useful = BitSet::new(self.state_count);
        let mut stack: Vec<State> = Vec::new();
        for root in self.roots() {
            if productive.contains_state(root) && useful.insert(root.index()) {
                stack.push(root);
            }
        }
        while let Some(s) = stack.pop() {
            for &rule_idx in &index.by_parent[s.index()] {
                let rule = &self.rules[rule_idx];
                if rule.children.iter().all(|c| productive.contains_state(*c)) {
                    for &c in &rule.children {
                        if useful.insert(c.index()) {
                            stack.push(c);
                        }
                    }
                }
            }
        }

        let mut map: StateMap = vec![None; self.state_count];
        for (next, s) in useful.iter().enumerate() {
            map[s] = Some(State::from(next));
        }
        debug!(
            "remove_useless: {} -> {} states ({} productive)",
            self.state_count,
            useful.len(),
            productive.len()
        );
        (self.map_states(&map, useful.len()), map)
    }

    /// Builds the image of `self` under `map`: states mapped to `None` are
    /// dropped together with every rule mentioning them.
    ///
    /// Several states may share an image; the rule set is merged accordingly.
    pub fn map_states(&self, map: &[Option<State>], state_count: usize) -> TreeAut {
        assert_eq!(map.len(), self.state_count, "State map must cover every state");

        let mut result = TreeAut::new();
        result.state_count = state_count;
        'rules: for rule in &self.rules {
            let Some(parent) = map[rule.parent.index()] else {
                continue;
            };
            let mut children = Vec::with_capacity(rule.arity());
            for c in &rule.children {
                match map[c.index()] {
                    Some(c) => children.push(c),
                    None => continue 'rules,
                }
            }
            result.insert_rule(Rule::new(rule.symbol, children, parent));
        }
        for root in self.roots() {
            if let Some(r) = map[root.index()] {
                result.roots.insert(r.index());
            }
        }
        result
    }

    /// Places `self` and `other` side by side in one automaton.
    ///
    /// States of `self` keep their ids; states of `other` are shifted by the
    /// returned offset. Both automata must draw their symbols from the same alphabet.
    pub fn disjoint_union(&self, other: &TreeAut) -> (TreeAut, u32) {
        let offset = self.state_count as u32;
        let mut result = self.clone();
        result.state_count += other.state_count;
        for rule in &other.rules {
            result.insert_rule(Rule::new(
                rule.symbol,
                rule.children.iter().map(|c| c.shifted(offset)).collect(),
                rule.parent.shifted(offset),
            ));
        }
        for root in other.roots() {
            result.roots.insert(root.shifted(offset).index());
        }
        (result, offset)
    }
}

/// Rule indices keyed by state.
#[derive(Debug, Clone)]
pub struct RuleIndex {
    /// `by_parent[s]`: rules whose parent is `s`.
    pub by_parent: Vec<Vec<usize>>,
    /// `occurrences[s]`: `(rule, position)` for every child slot holding `s`.
    pub occurrences: Vec<Vec<(usize, usize)>>,
}
