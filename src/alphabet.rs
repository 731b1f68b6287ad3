//! Ranked alphabets.
//!
//! An [`Alphabet`] maps symbol names to dense [`Symbol`] ids and fixes the
//! arity (rank) of every symbol. The alphabet grows lazily: a symbol becomes
//! known the first time it is used, and its arity is pinned by that first use.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::Symbol;

#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    names: Vec<String>,
    arities: Vec<usize>,
    index: HashMap<String, Symbol>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known symbols.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the symbol called `name`, registering it with `arity` if it is new.
    ///
    /// Fails with [`Error::ArityMismatch`] when the name is already known with
    /// a different arity.
    pub fn symbol(&mut self, name: &str, arity: usize) -> Result<Symbol> {
        if let Some(&symbol) = self.index.get(name) {
            let expected = self.arities[symbol.index()];
            if expected != arity {
                return Err(Error::ArityMismatch {
                    symbol: name.to_string(),
                    expected,
                    found: arity,
                });
            }
            return Ok(symbol);
        }
        let symbol = Symbol::new(self.names.len() as u32);
        self.names.push(name.to_string());
        self.arities.push(arity);
        self.index.insert(name.to_string(), symbol);
        Ok(symbol)
    }

    /// Looks up a symbol by name.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.index.get(name).copied()
    }

    /// Returns the arity of a symbol issued by this alphabet.
    pub fn arity(&self, symbol: Symbol) -> usize {
        self.arities[symbol.index()]
    }

    /// Returns the name of a symbol issued by this alphabet.
    pub fn name(&self, symbol: Symbol) -> &str {
        &self.names[symbol.index()]
    }

    /// Iterates over all symbols in issue order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.names.len() as u32).map(Symbol::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_registration() {
        let mut alphabet = Alphabet::new();
        let a = alphabet.symbol("a", 0).unwrap();
        let f = alphabet.symbol("f", 2).unwrap();
        assert_ne!(a, f);
        assert_eq!(alphabet.symbol("a", 0).unwrap(), a);
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.arity(f), 2);
        assert_eq!(alphabet.name(a), "a");
        assert_eq!(alphabet.get("f"), Some(f));
        assert_eq!(alphabet.get("g"), None);
        assert_eq!(alphabet.symbols().collect::<Vec<_>>(), vec![a, f]);
    }

    #[test]
    fn test_arity_mismatch() {
        let mut alphabet = Alphabet::new();
        alphabet.symbol("f", 2).unwrap();
        let err = alphabet.symbol("f", 1).unwrap_err();
        assert_eq!(
            err,
            Error::ArityMismatch {
                symbol: "f".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }
}
