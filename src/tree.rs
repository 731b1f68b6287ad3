//! Finite ranked trees (ground terms).
//!
//! Trees are what tree automata accept. They are mostly used to spot-check
//! languages: run a tree through two automata and compare the verdicts.
//!
//! ```
//! use ta_rs::alphabet::Alphabet;
//! use ta_rs::tree::Tree;
//!
//! let mut alphabet = Alphabet::new();
//! let t = Tree::parse("f(a, g(b))", &mut alphabet).unwrap();
//! assert_eq!(t.height(), 3);
//! assert_eq!(t.display(&alphabet).to_string(), "f(a,g(b))");
//! ```

use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use crate::types::Symbol;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Tree {
    symbol: Symbol,
    children: Vec<Tree>,
}

impl Tree {
    pub fn leaf(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
        }
    }

    pub fn node(symbol: Symbol, children: Vec<Tree>) -> Self {
        Self { symbol, children }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    /// Number of nodes on the longest root-to-leaf path; a leaf has height 1.
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(Tree::height).max().unwrap_or(0)
    }

    /// Total number of nodes.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Tree::size).sum::<usize>()
    }

    /// Parses a term such as `f(a,g(b))`, registering symbols in `alphabet`.
    ///
    /// Arities are taken from the number of arguments, so the same name used
    /// with two different argument counts is an [`Error::ArityMismatch`].
    pub fn parse(text: &str, alphabet: &mut Alphabet) -> Result<Tree> {
        let mut parser = TermParser {
            chars: text.char_indices().peekable(),
            text,
        };
        let tree = parser.term(alphabet)?;
        parser.skip_ws();
        if let Some((i, c)) = parser.chars.next() {
            return Err(Error::parse(1, format!("unexpected `{}` at offset {}", c, i)));
        }
        Ok(tree)
    }

    /// All trees over the symbols of `alphabet` with height at most `max_height`.
    ///
    /// The count grows doubly exponentially with the height; keep it small.
    pub fn enumerate(alphabet: &Alphabet, max_height: usize) -> Vec<Tree> {
        let mut all: Vec<Tree> = Vec::new();
        for h in 0..max_height {
            let mut layer = Vec::new();
            for symbol in alphabet.symbols() {
                let k = alphabet.arity(symbol);
                if k == 0 {
                    if h == 0 {
                        layer.push(Tree::leaf(symbol));
                    }
                    continue;
                }
                if h == 0 || all.is_empty() {
                    continue;
                }
                // Children of height <= h, at least one of height exactly h.
                let mut tuple = vec![0usize; k];
                loop {
                    let children: Vec<&Tree> = tuple.iter().map(|&i| &all[i]).collect();
                    if children.iter().any(|t| t.height() == h) {
                        layer.push(Tree::node(symbol, children.into_iter().cloned().collect()));
                    }
                    // Odometer increment over `all^k`.
                    let mut pos = 0;
                    while pos < k {
                        tuple[pos] += 1;
                        if tuple[pos] < all.len() {
                            break;
                        }
                        tuple[pos] = 0;
                        pos += 1;
                    }
                    if pos == k {
                        break;
                    }
                }
            }
            all.extend(layer);
        }
        all
    }

    /// Helper for printing a tree with symbol names.
    pub fn display<'a>(&'a self, alphabet: &'a Alphabet) -> TreeDisplay<'a> {
        TreeDisplay { tree: self, alphabet }
    }
}

pub struct TreeDisplay<'a> {
    tree: &'a Tree,
    alphabet: &'a Alphabet,
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alphabet.name(self.tree.symbol))?;
        if !self.tree.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.tree.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", child.display(self.alphabet))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

struct TermParser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text: &'a str,
}

impl TermParser<'_> {
    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn name(&mut self) -> Result<String> {
        self.skip_ws();
        let start = match self.chars.peek() {
            Some(&(i, c)) if is_name_char(c) => i,
            Some(&(i, c)) => return Err(Error::parse(1, format!("expected symbol, found `{}` at offset {}", c, i))),
            None => return Err(Error::parse(1, "expected symbol, found end of input")),
        };
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if !is_name_char(c) {
                break;
            }
            end = i + c.len_utf8();
            self.chars.next();
        }
        Ok(self.text[start..end].to_string())
    }

    fn term(&mut self, alphabet: &mut Alphabet) -> Result<Tree> {
        let name = self.name()?;
        self.skip_ws();
        let mut children = Vec::new();
        if let Some(&(_, '(')) = self.chars.peek() {
            self.chars.next();
            self.skip_ws();
            if let Some(&(_, ')')) = self.chars.peek() {
                self.chars.next();
            } else {
                loop {
                    children.push(self.term(alphabet)?);
                    self.skip_ws();
                    match self.chars.next() {
                        Some((_, ',')) => continue,
                        Some((_, ')')) => break,
                        Some((i, c)) => return Err(Error::parse(1, format!("expected `,` or `)`, found `{}` at offset {}", c, i))),
                        None => return Err(Error::parse(1, "unclosed `(`")),
                    }
                }
            }
        }
        let symbol = alphabet.symbol(&name, children.len())?;
        Ok(Tree::node(symbol, children))
    }
}

pub(crate) fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | ':')
}
