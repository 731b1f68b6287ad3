//! Tree automaton to DOT (Graphviz) conversion.
//!
//! The generated graph follows these conventions:
//! - **States** are circles labeled with their names; root states are double circles.
//! - **Rules** are small boxes labeled with the symbol. Each child state has
//!   an edge into the box (labeled with its position when the rule has more
//!   than one child) and the box has an edge into the parent state.
//! - Nullary rules sit on the source rank, so leaves are drawn at the top and
//!   derivations flow towards the roots.
//!
//! # Examples
//!
//! ```
//! use ta_rs::timbuk;
//!
//! let text = "Ops a:0 f:2\nAutomaton A\nStates q0 q1\nFinal States q1\nTransitions\na -> q0\nf(q0,q0) -> q1\n";
//! let (parsed, alphabet) = timbuk::parse(text).unwrap();
//! let dot = parsed.aut.to_dot(&parsed.dict, &alphabet).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.contains("q1 [shape=doublecircle"));
//! ```

use crate::alphabet::Alphabet;
use crate::automaton::TreeAut;
use crate::dict::StateDict;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for ordinary states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for root states (default: "doublecircle")
    pub root_shape: &'static str,
    /// Shape for rule nodes (default: "box")
    pub rule_shape: &'static str,
    /// Whether to label child edges with their position (default: true)
    pub label_positions: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            root_shape: "doublecircle",
            rule_shape: "box",
            label_positions: true,
        }
    }
}

impl TreeAut {
    /// Converts the automaton to DOT (Graphviz) format, naming states through `dict`.
    pub fn to_dot(&self, dict: &StateDict, alphabet: &Alphabet) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(dict, alphabet, &DotConfig::default())
    }

    /// Converts the automaton to DOT format with custom configuration.
    ///
    /// ```
    /// use ta_rs::alphabet::Alphabet;
    /// use ta_rs::automaton::TreeAut;
    /// use ta_rs::dict::StateDict;
    /// use ta_rs::dot::DotConfig;
    ///
    /// let mut alphabet = Alphabet::new();
    /// let a = alphabet.symbol("a", 0).unwrap();
    /// let mut aut = TreeAut::new();
    /// let q = aut.add_state();
    /// aut.add_rule(a, vec![], q).unwrap();
    ///
    /// let config = DotConfig {
    ///     state_shape: "ellipse",
    ///     ..DotConfig::default()
    /// };
    /// let dot = aut.to_dot_with_config(&StateDict::new(), &alphabet, &config).unwrap();
    /// assert!(dot.contains("q0 [shape=ellipse"));
    /// ```
    pub fn to_dot_with_config(
        &self,
        dict: &StateDict,
        alphabet: &Alphabet,
        config: &DotConfig,
    ) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;

        for state in self.states() {
            let name = dict.name_or_id(state);
            let shape = if self.is_root(state) {
                config.root_shape
            } else {
                config.state_shape
            };
            writeln!(dot, "{} [shape={}, label=\"{}\"];", quote(&name), shape, escape(&name))?;
        }

        // Leaves on top.
        writeln!(dot, "{{ rank=source")?;
        for (i, rule) in self.rules().enumerate() {
            if rule.arity() == 0 {
                writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.rule_shape, escape(alphabet.name(rule.symbol)))?;
            }
        }
        writeln!(dot, "}}")?;

        for (i, rule) in self.rules().enumerate() {
            if rule.arity() > 0 {
                writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.rule_shape, escape(alphabet.name(rule.symbol)))?;
            }
            for (pos, child) in rule.children.iter().enumerate() {
                let child = quote(&dict.name_or_id(*child));
                if config.label_positions && rule.arity() > 1 {
                    writeln!(dot, "{} -> r{} [label=\"{}\"];", child, i, pos + 1)?;
                } else {
                    writeln!(dot, "{} -> r{};", child, i)?;
                }
            }
            writeln!(dot, "r{} -> {};", i, quote(&dict.name_or_id(rule.parent)))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

/// DOT identifier for a state name; plain names stay unquoted.
fn quote(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') && !name.starts_with(|c: char| c.is_ascii_digit()) {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}

/// Contents of a quoted DOT string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TreeAut, StateDict, Alphabet) {
        let mut alphabet = Alphabet::new();
        let a = alphabet.symbol("a", 0).unwrap();
        let f = alphabet.symbol("f", 2).unwrap();
        let mut aut = TreeAut::new();
        let mut dict = StateDict::new();
        let leaf = aut.add_state();
        dict.insert("leaf", leaf);
        let top = aut.add_state();
        dict.insert("top'", top);
        aut.add_rule(a, vec![], leaf).unwrap();
        aut.add_rule(f, vec![leaf, leaf], top).unwrap();
        aut.mark_root(top).unwrap();
        (aut, dict, alphabet)
    }

    #[test]
    fn test_to_dot_basic() {
        let (aut, dict, alphabet) = sample();
        let dot = aut.to_dot(&dict, &alphabet).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("\"top'\" [shape=doublecircle, label=\"top'\"];"));
        assert!(dot.contains("r0 [shape=box, label=\"a\"];"));
        assert!(dot.contains("leaf -> r1 [label=\"2\"];"));
        assert!(dot.contains("r1 -> \"top'\";"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let (aut, dict, alphabet) = sample();
        let config = DotConfig {
            label_positions: false,
            ..DotConfig::default()
        };
        let dot = aut.to_dot_with_config(&dict, &alphabet, &config).unwrap();
        assert!(dot.contains("leaf -> r1;"));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("q0"), "q0");
        assert_eq!(quote("0q"), "\"0q\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_names_with_quotes_are_escaped() {
        let (aut, _, alphabet) = sample();
        let mut dict = StateDict::new();
        let mut states = aut.states();
        dict.insert("say\"hi\"", states.next().unwrap());
        dict.insert("top", states.next().unwrap());
        let dot = aut.to_dot(&dict, &alphabet).unwrap();
        assert!(dot.contains("\"say\\\"hi\\\"\" [shape=circle, label=\"say\\\"hi\\\"\"];"));
        assert!(!dot.contains("label=\"say\"hi"));
    }
}
