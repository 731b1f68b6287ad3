//! Timbuk text format.
//!
//! ```text
//! Ops a:0 f:2
//!
//! Automaton A1
//! States q0 q1
//! Final States q1
//! Transitions
//! a -> q0
//! f(q0,q0) -> q1
//! ```
//!
//! Sections come in the order shown and items of a section may span
//! several lines; each transition sits on its own line. A nullary rule may
//! be written `a -> q` or `a() -> q`. A state may carry a `:n` suffix in the
//! `States` section, which is ignored. Every state used under
//! `Final States` or `Transitions` must be declared under `States`. Symbols
//! missing from `Ops` take their arity from their first rule.
//!
//! Two automata that are compared must be parsed into the same
//! [`Alphabet`] with [`parse_into`], so that equal names mean equal symbols.

use std::fmt::Write;

use crate::alphabet::Alphabet;
use crate::automaton::TreeAut;
use crate::dict::StateDict;
use crate::error::{Error, Result};
use crate::tree::is_name_char;
use crate::types::State;

/// An automaton read from Timbuk text, with its state names.
#[derive(Debug, Clone)]
pub struct TimbukAut {
    pub name: String,
    pub aut: TreeAut,
    pub dict: StateDict,
}

impl TimbukAut {
    pub fn to_timbuk(&self, alphabet: &Alphabet) -> String {
        serialize(&self.name, &self.aut, &self.dict, alphabet)
    }
}

/// Parses one automaton into a fresh alphabet.
pub fn parse(text: &str) -> Result<(TimbukAut, Alphabet)> {
    let mut alphabet = Alphabet::new();
    let parsed = parse_into(text, &mut alphabet)?;
    Ok((parsed, alphabet))
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
enum Section {
    Start,
    Ops,
    Automaton,
    States,
    Final,
    Transitions,
}

/// Parses one automaton, registering its symbols in `alphabet`.
pub fn parse_into(text: &str, alphabet: &mut Alphabet) -> Result<TimbukAut> {
    let mut name = String::new();
    let mut aut = TreeAut::new();
    let mut dict = StateDict::new();
    let mut section = Section::Start;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace().peekable();
        let Some(&first) = tokens.peek() else {
            continue;
        };
        let next = match first {
            "Ops" => Some(Section::Ops),
            "Automaton" => Some(Section::Automaton),
            "States" => Some(Section::States),
            "Final" => Some(Section::Final),
            "Transitions" => Some(Section::Transitions),
            _ => None,
        };
        if let Some(next) = next {
            if next <= section {
                return Err(Error::parse(line_no, format!("unexpected section `{}`", first)));
            }
            section = next;
            tokens.next();
            if next == Section::Final && tokens.next() != Some("States") {
                return Err(Error::parse(line_no, "expected `Final States`"));
            }
        }

        match section {
            Section::Start => {
                return Err(Error::parse(line_no, format!("expected `Ops`, found `{}`", first)));
            }
            Section::Ops => {
                for token in tokens {
                    let (symbol, arity) = token
                        .split_once(':')
                        .ok_or_else(|| Error::parse(line_no, format!("expected `symbol:arity`, found `{}`", token)))?;
                    let arity: usize = arity
                        .parse()
                        .map_err(|_| Error::parse(line_no, format!("invalid arity `{}`", arity)))?;
                    check_name(line_no, symbol)?;
                    alphabet.symbol(symbol, arity)?;
                }
            }
            Section::Automaton => {
                for token in tokens {
                    if !name.is_empty() {
                        return Err(Error::parse(line_no, format!("unexpected `{}` after automaton name", token)));
                    }
                    name = token.to_string();
                }
            }
            Section::States => {
                for token in tokens {
                    let state_name = token.split_once(':').map_or(token, |(n, _)| n);
                    check_name(line_no, state_name)?;
                    if dict.state(state_name).is_some() {
                        return Err(Error::parse(line_no, format!("state `{}` declared twice", state_name)));
                    }
                    let state = aut.add_state();
                    dict.insert(state_name, state);
                }
            }
            Section::Final => {
                for token in tokens {
                    let state = lookup(&dict, line_no, token)?;
                    aut.mark_root(state)?;
                }
            }
            Section::Transitions => {
                let rest: Vec<&str> = tokens.collect();
                if !rest.is_empty() {
                    parse_rule(&rest.join(" "), line_no, alphabet, &mut aut, &dict)?;
                }
            }
        }
    }

    if section < Section::Transitions {
        return Err(Error::parse(text.lines().count().max(1), "missing `Transitions` section"));
    }
    Ok(TimbukAut { name, aut, dict })
}

fn parse_rule(text: &str, line_no: usize, alphabet: &mut Alphabet, aut: &mut TreeAut, dict: &StateDict) -> Result<()> {
    let (lhs, rhs) = text
        .split_once("->")
        .ok_or_else(|| Error::parse(line_no, "expected `->` in transition"))?;
    let parent = lookup(dict, line_no, rhs.trim())?;

    let lhs = lhs.trim();
    let (symbol, children) = match lhs.find('(') {
        Some(open) => {
            let inner = lhs[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| Error::parse(line_no, "unclosed `(` in transition"))?;
            let children = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner
                    .split(',')
                    .map(|c| lookup(dict, line_no, c.trim()))
                    .collect::<Result<Vec<_>>>()?
            };
            (lhs[..open].trim(), children)
        }
        None => (lhs, Vec::new()),
    };
    check_name(line_no, symbol)?;
    let symbol = alphabet.symbol(symbol, children.len())?;
    aut.add_rule(symbol, children, parent)
}

fn check_name(line_no: usize, name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(Error::parse(line_no, format!("invalid name `{}`", name)));
    }
    Ok(())
}

fn lookup(dict: &StateDict, line_no: usize, name: &str) -> Result<State> {
    check_name(line_no, name)?;
    dict.state(name)
        .ok_or_else(|| Error::parse(line_no, format!("undeclared state `{}`", name)))
}

/// Renders `aut` in Timbuk format, naming states through `dict`.
pub fn serialize(name: &str, aut: &TreeAut, dict: &StateDict, alphabet: &Alphabet) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_timbuk(&mut out, name, aut, dict, alphabet);
    out
}

fn write_timbuk(
    out: &mut String,
    name: &str,
    aut: &TreeAut,
    dict: &StateDict,
    alphabet: &Alphabet,
) -> std::fmt::Result {
    write!(out, "Ops")?;
    for symbol in alphabet.symbols() {
        write!(out, " {}:{}", alphabet.name(symbol), alphabet.arity(symbol))?;
    }
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "Automaton {}", if name.is_empty() { "anonymous" } else { name })?;
    writeln!(out)?;

    write!(out, "States")?;
    for state in aut.states() {
        write!(out, " {}", dict.name_or_id(state))?;
    }
    writeln!(out)?;
    writeln!(out)?;

    write!(out, "Final States")?;
    for state in aut.roots() {
        write!(out, " {}", dict.name_or_id(state))?;
    }
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "Transitions")?;
    for rule in aut.rules() {
        write!(out, "{}", alphabet.name(rule.symbol))?;
        if rule.arity() > 0 {
            write!(out, "(")?;
            for (i, child) in rule.children.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                write!(out, "{}", dict.name_or_id(*child))?;
            }
            write!(out, ")")?;
        }
        writeln!(out, " -> {}", dict.name_or_id(rule.parent))?;
    }
    Ok(())
}
