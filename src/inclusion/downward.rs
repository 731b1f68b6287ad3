//! Top-down antichain inclusion.
//!
//! An obligation `(p, P)` asks whether `L(p) ⊆ L(P)`, where `p` is a state of
//! the smaller automaton and `P` a set of states of the bigger one. The
//! search starts from `(r, roots)` for every root `r` of the smaller
//! automaton.
//!
//! For a rule `f(p_1, ..., p_k) -> p` let `T` be the child tuples of the
//! bigger automaton's `f`-rules into `P`. The obligation is refuted iff for
//! some rule and some choice function `φ : T -> {1..k}` every child
//! obligation `(p_i, {t_i | t ∈ T, φ(t) = i})` is refuted. Refutation is the
//! least fixed point of this condition: the obligation graph is explored on
//! an explicit worklist and refutations are propagated backwards through
//! counters, one per clause `(rule, φ)`.
//!
//! # Pruning
//!
//! - `(p, P)` holds outright if `p` is unproductive or some `q ∈ P`
//!   simulates `p` in the disjoint union of both automata. It is refuted
//!   outright if `P` is empty and `p` is productive.
//! - Choice functions are enumerated depth-first over the tuples. A partial
//!   choice whose child obligation already holds outright is not extended,
//!   since every completion of it yields a clause that can never fire.
//! - A refuted `(p, P)` refutes every `(x, X)` with `p ⪯ x` and `X` covered by
//!   `P`. Refuted obligations are kept as an antichain of the most general ones.
//! - With [`use_simulation`][super::InclusionParams::use_simulation], `⪯` is
//!   the downward simulation of the disjoint union rather than the identity,
//!   and `P` is reduced to its maximal elements.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::debug;

use super::{Frontier, InclusionParams, InclusionStats};
use crate::automaton::{Rule, RuleIndex, TreeAut};
use crate::bitset::BitSet;
use crate::cache::Cache;
use crate::relation::Relation;
use crate::simulation::compute_downward_simulation;
use crate::types::{State, Symbol};

/// Child tuples of the bigger automaton, as state indices.
type Tuples = Rc<Vec<Vec<usize>>>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Status {
    Pending,
    Expanded,
    Refuted,
    Proven,
}

struct Node {
    state: usize,
    set: BitSet,
    status: Status,
    seed: bool,
    /// Clauses in which this node occurs as a child.
    watchers: Vec<usize>,
}

/// Conjunction of child obligations refuting `owner`.
struct Clause {
    owner: usize,
    remaining: usize,
}

struct Search<'a> {
    smaller: &'a TreeAut,
    bigger: &'a TreeAut,
    rules: Vec<&'a Rule>,
    index: RuleIndex,
    productive: BitSet,
    order_small: Relation,
    order_big: Relation,
    /// Downward simulation of the disjoint union.
    cross: Relation,
    /// Offset of the states of `bigger` in the disjoint union.
    offset: u32,
    normalize: bool,
    nodes: Vec<Node>,
    lookup: HashMap<(usize, BitSet), usize>,
    clauses: Vec<Clause>,
    /// Most general refuted obligations.
    refuted: Vec<usize>,
    failed: bool,
    frontier: Frontier,
    cache: Option<Cache<(Symbol, BitSet), Tuples>>,
    stats: InclusionStats,
}

pub(super) fn check(smaller: &TreeAut, bigger: &TreeAut, params: &InclusionParams) -> (bool, InclusionStats) {
    let (union, offset) = smaller.disjoint_union(bigger);
    let cross = compute_downward_simulation(&union);
    let (order_small, order_big) = if params.use_simulation {
        (
            cross.restrict(0, offset as usize),
            cross.restrict(offset as usize, bigger.state_count()),
        )
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
        index: smaller.index(),
        productive: smaller.productive_states(),
        order_small,
        order_big,
        cross,
        offset,
        normalize: params.use_simulation,
        nodes: Vec::new(),
        lookup: HashMap::new(),
        clauses: Vec::new(),
        refuted: Vec::new(),
        failed: false,
        frontier: Frontier::new(params),
        cache: params.use_downward_cache.then(Cache::default),
        stats: InclusionStats::default(),
    };
    let result = search.run();
    if let Some(cache) = &search.cache {
        search.stats.cache_hits = cache.hits();
        search.stats.cache_misses = cache.misses();
    }
    debug!(
        "downward: {} obligations, {} clauses, {} refuted kept",
        search.nodes.len(),
        search.clauses.len(),
        search.refuted.len()
    );
    (result, search.stats)
}

impl Search<'_> {
    fn run(&mut self) -> bool {
        let smaller = self.smaller;
        let roots = self.bigger.root_set().clone();
        for root in smaller.roots() {
            let id = self.obligation(root.index(), roots.clone());
            self.nodes[id].seed = true;
            if self.nodes[id].status == Status::Refuted {
                return false;
            }
        }

        while let Some(id) = self.frontier.pop() {
            if self.nodes[id].status != Status::Pending {
                continue;
            }
            self.expand(id);
            if self.failed {
                return false;
            }
        }
        true
    }

    /// Returns the node for `(state, set)`, creating and classifying it if new.
    fn obligation(&mut self, state: usize, set: BitSet) -> usize {
        let set = self.normalize(set);
        if let Some(&id) = self.lookup.get(&(state, set.clone())) {
            return id;
        }
        let status = self.classify(state, &set);
        let id = self.nodes.len();
        self.nodes.push(Node {
            state,
            set: set.clone(),
            status,
            seed: false,
            watchers: Vec::new(),
        });
        self.lookup.insert((state, set), id);
        match status {
            Status::Pending => self.frontier.push(id),
            Status::Refuted => self.record_refuted(id),
            _ => {}
        }
        id
    }

    /// Keeps only the simulation-maximal states of `set`.
    fn normalize(&self, set: BitSet) -> BitSet {
        if !self.normalize {
            return set;
        }
        set.iter()
            .filter(|&q| {
                !set.iter().any(|r| {
                    r != q
                        && self.order_big.contains(State::from(q), State::from(r))
                        && (!self.order_big.contains(State::from(r), State::from(q)) || r < q)
                })
            })
            .collect()
    }

    /// Whether `(state, set)` holds without exploring it.
    fn holds_outright(&self, state: usize, set: &BitSet) -> bool {
        let p = State::from(state);
        !self.productive.contains(state) || set.states().any(|q| self.cross.contains(p, q.shifted(self.offset)))
    }

    fn classify(&mut self, state: usize, set: &BitSet) -> Status {
        if !self.productive.contains(state) {
            return Status::Proven;
        }
        if set.is_empty() {
            return Status::Refuted;
        }
        if self.holds_outright(state, set) {
            self.stats.pruned += 1;
            return Status::Proven;
        }
        let dominated = self.refuted.iter().any(|&r| {
            let r = &self.nodes[r];
            self.order_small.contains(State::from(r.state), State::from(state))
                && self.order_big.is_covered(set, &r.set)
        });
        if dominated {
            self.stats.pruned += 1;
            return Status::Refuted;
        }
        Status::Pending
    }

    fn record_refuted(&mut self, id: usize) {
        let (state, set) = (self.nodes[id].state, &self.nodes[id].set);
        let before = self.refuted.len();
        let nodes = &self.nodes;
        let (order_small, order_big) = (&self.order_small, &self.order_big);
        self.refuted.retain(|&r| {
            let r = &nodes[r];
            !(order_small.contains(State::from(state), State::from(r.state)) && order_big.is_covered(&r.set, set))
        });
        self.stats.removed += before - self.refuted.len();
        self.refuted.push(id);
    }

    /// Marks `id` refuted and propagates through the clauses watching it.
    fn refute(&mut self, id: usize) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if self.nodes[n].status == Status::Refuted {
                continue;
            }
            debug_assert_ne!(self.nodes[n].status, Status::Proven);
            self.nodes[n].status = Status::Refuted;
            if self.nodes[n].seed {
                self.failed = true;
            }
            self.record_refuted(n);
            for clause in std::mem::take(&mut self.nodes[n].watchers) {
                let clause = &mut self.clauses[clause];
                clause.remaining -= 1;
                if clause.remaining == 0 {
                    stack.push(clause.owner);
                }
            }
        }
    }

    /// Child tuples of the `symbol`-rules of `bigger` with `arity` children
    /// and a parent in `set`.
    fn tuples(&mut self, symbol: Symbol, arity: usize, set: &BitSet) -> Tuples {
        let bigger = self.bigger;
        // The arity of `symbol` is fixed in `smaller`, so it need not be part of the key.
        let compute = |(symbol, set): &(Symbol, BitSet)| -> Tuples {
            let mut tuples: Vec<Vec<usize>> = bigger
                .rules_for(*symbol)
                .filter(|rule| rule.arity() == arity && set.contains_state(rule.parent))
                .map(|rule| rule.children.iter().map(|c| c.index()).collect())
                .collect();
            tuples.sort_unstable();
            tuples.dedup();
            Rc::new(tuples)
        };
        match &mut self.cache {
            Some(cache) => Rc::clone(cache.get_or_insert_with((symbol, set.clone()), compute)),
            None => compute(&(symbol, set.clone())),
        }
    }

    fn expand(&mut self, id: usize) {
        self.stats.explored += 1;
        self.nodes[id].status = Status::Expanded;
        let (state, set) = (self.nodes[id].state, self.nodes[id].set.clone());

        for r in 0..self.index.by_parent[state].len() {
            let rule = self.rules[self.index.by_parent[state][r]];
            let k = rule.arity();
            let tuples = self.tuples(rule.symbol, k, &set);

            if k == 0 {
                if tuples.is_empty() {
                    // A leaf the bigger side cannot produce here.
                    self.refute(id);
                    return;
                }
                continue;
            }

            // Depth-first over choice functions: tuple `j` goes to child `choice[j]`,
            // and `stack[j]` holds the parts built from the first `j` tuples.
            let mut seen: HashSet<Vec<BitSet>> = HashSet::new();
            let mut choice = vec![0usize; tuples.len()];
            let mut stack = vec![vec![BitSet::default(); k]];
            let mut depth = 0;
            'choices: loop {
                if depth == tuples.len() {
                    let parts = stack[depth].clone();
                    if seen.insert(parts.clone()) && self.add_clause(id, rule, parts) {
                        return;
                    }
                } else {
                    let i = choice[depth];
                    let mut next = stack[depth].clone();
                    next[i].insert(tuples[depth][i]);
                    if !self.holds_outright(rule.children[i].index(), &next[i]) {
                        stack.truncate(depth + 1);
                        stack.push(next);
                        depth += 1;
                        continue;
                    }
                    // Every completion keeps this child true: skip them all.
                    depth += 1;
                }

                // Backtrack to the deepest tuple with an untried child.
                loop {
                    if depth == 0 {
                        break 'choices;
                    }
                    depth -= 1;
                    choice[depth] += 1;
                    if choice[depth] < k {
                        break;
                    }
                    choice[depth] = 0;
                }
            }
        }
    }

    /// Adds the clause `(p_i, parts[i])` for all `i`. Returns true if it
    /// refuted its owner on the spot.
    fn add_clause(&mut self, owner: usize, rule: &Rule, parts: Vec<BitSet>) -> bool {
        let mut children: Vec<usize> = Vec::with_capacity(parts.len());
        for (child, part) in rule.children.iter().zip(parts) {
            let node = self.obligation(child.index(), part);
            match self.nodes[node].status {
                Status::Proven => return false,
                Status::Refuted => {}
                _ => children.push(node),
            }
        }
        children.sort_unstable();
        children.dedup();

        if children.is_empty() {
            self.refute(owner);
            return true;
        }
        let clause = self.clauses.len();
        self.clauses.push(Clause {
            owner,
            remaining: children.len(),
        });
        for child in children {
            self.nodes[child].watchers.push(clause);
        }
        false
    }
}
