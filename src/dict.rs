//! Symbolic names for states.
//!
//! A [`StateDict`] is the satellite of exactly one [`TreeAut`][crate::automaton::TreeAut]:
//! it maps textual state names to the dense ids of that automaton and back.
//! When an automaton is transformed into a new one, the dictionary follows
//! through [`StateDict::translate`].

use std::collections::HashMap;

use crate::automaton::StateMap;
use crate::types::State;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDict {
    names: Vec<String>,
    index: HashMap<String, State>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Binds `name` to `state`.
    ///
    /// # Panics
    ///
    /// Panics if either the name or the state is already bound, or if
    /// states are not bound in allocation order.
    pub fn insert(&mut self, name: &str, state: State) {
        assert_eq!(state.index(), self.names.len(), "States must be named in allocation order");
        assert!(!self.index.contains_key(name), "State name `{}` is already bound", name);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), state);
    }

    pub fn state(&self, name: &str) -> Option<State> {
        self.index.get(name).copied()
    }

    pub fn name(&self, state: State) -> Option<&str> {
        self.names.get(state.index()).map(String::as_str)
    }

    /// Name of `state`, or its numeric fallback when it has none.
    pub fn name_or_id(&self, state: State) -> String {
        match self.name(state) {
            Some(name) => name.to_string(),
            None => format!("q{}", state.id()),
        }
    }

    /// Carries the names over to the image automaton of `map`.
    ///
    /// A target state is named after the first (lowest-id) source state
    /// mapped onto it; dropped states lose their names.
    pub fn translate(&self, map: &StateMap, target_count: usize) -> StateDict {
        let mut chosen: Vec<Option<State>> = vec![None; target_count];
        for (source, image) in map.iter().enumerate() {
            if let Some(t) = image {
                chosen[t.index()].get_or_insert(State::from(source));
            }
        }
        let mut result = StateDict::new();
        for (t, source) in chosen.into_iter().enumerate() {
            let name = match source {
                Some(s) => self.name_or_id(s),
                None => format!("q{}", t),
            };
            let name = result.fresh(name);
            result.insert(&name, State::from(t));
        }
        result
    }

    /// `name`, primed until it no longer clashes with a bound name.
    fn fresh(&self, mut name: String) -> String {
        while self.index.contains_key(&name) {
            name.push('\'');
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut dict = StateDict::new();
        dict.insert("q0", State::new(0));
        dict.insert("acc", State::new(1));
        assert_eq!(dict.state("acc"), Some(State::new(1)));
        assert_eq!(dict.name(State::new(0)), Some("q0"));
        assert_eq!(dict.name(State::new(2)), None);
        assert_eq!(dict.name_or_id(State::new(2)), "q2");
        assert_eq!(dict.len(), 2);
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn test_duplicate_name() {
        let mut dict = StateDict::new();
        dict.insert("q", State::new(0));
        dict.insert("q", State::new(1));
    }

    #[test]
    fn test_translate() {
        let mut dict = StateDict::new();
        for (i, name) in ["x", "y", "z"].iter().enumerate() {
            dict.insert(name, State::from(i));
        }
        // y and z collapse onto the same state, x is dropped.
        let map = vec![None, Some(State::new(0)), Some(State::new(0))];
        let translated = dict.translate(&map, 1);
        assert_eq!(translated.len(), 1);
        assert_eq!(translated.name(State::new(0)), Some("y"));
    }
}
