//! Error type shared by the automaton model and the Timbuk front end.
//!
//! All errors are detected while an automaton is being *built* (parsed or
//! assembled rule by rule). The algorithms themselves (simulation, reduction,
//! inclusion) are total on a well-formed automaton and never fail.

use thiserror::Error;

use crate::types::State;

/// Errors raised while constructing or parsing an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed textual input.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending input.
        line: usize,
        /// Human-readable description.
        message: String,
    },

    /// A rule or the root set refers to a state that was never allocated
    /// by the automaton it is added to.
    #[error("unknown state {0}")]
    UnknownState(State),

    /// A symbol is used with a different number of children than before.
    #[error("arity mismatch for symbol `{symbol}`: expected {expected}, found {found}")]
    ArityMismatch {
        /// Name of the symbol. A [`TreeAut`](crate::automaton::TreeAut) knows no
        /// names and reports the symbol id instead (`#2`).
        symbol: String,
        /// Arity recorded by earlier uses.
        expected: usize,
        /// Arity of the offending use.
        found: usize,
    },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::parse(3, "unexpected token `)`");
        assert_eq!(e.to_string(), "parse error at line 3: unexpected token `)`");

        let e = Error::UnknownState(State::new(7));
        assert_eq!(e.to_string(), "unknown state s7");

        let e = Error::ArityMismatch {
            symbol: "f".to_string(),
            expected: 2,
            found: 1,
        };
        assert_eq!(e.to_string(), "arity mismatch for symbol `f`: expected 2, found 1");
    }
}
