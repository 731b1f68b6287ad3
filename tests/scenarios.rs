mod common;

use test_log::test;

use ta_rs::alphabet::Alphabet;
use ta_rs::commands;
use ta_rs::inclusion::check_inclusion;
use ta_rs::timbuk;
use ta_rs::tree::Tree;

const A1: &str = "Ops a:0 f:2
Automaton A1
States q0 q1
Final States q1
Transitions
a -> q0
f(q0,q0) -> q1
";

const A2: &str = "Ops a:0 f:2
Automaton A2
States q0 q1 q2
Final States q1
Transitions
a -> q0
f(q0,q0) -> q1
a -> q2
";

const A3: &str = "Ops a:0 f:2
Automaton A3
States p0 p1
Final States p1
Transitions
a -> p0
f(p0,p0) -> p1
";

const A4: &str = "Ops a:0 f:2
Automaton A4
States r0 r1
Final States r0 r1
Transitions
a -> r0
f(r0,r0) -> r1
";

#[test]
fn test_unreachable_state_is_dropped() {
    let reduced = commands::reduce(A2).unwrap();
    let (parsed, _) = timbuk::parse(&reduced).unwrap();
    let (a1, _) = timbuk::parse(A1).unwrap();
    assert_eq!(parsed.aut.state_count(), 2);
    assert_eq!(parsed.aut.rule_count(), a1.aut.rule_count());
    assert!(parsed.dict.state("q2").is_none());

    assert_eq!(commands::check_inclusion(A1, A2), Ok(true));
    assert_eq!(commands::check_inclusion(A2, A1), Ok(true));
}

#[test]
fn test_strict_inclusion() {
    assert_eq!(commands::check_inclusion(A3, A4), Ok(true));
    assert_eq!(commands::check_inclusion(A4, A3), Ok(false));

    for params in common::all_params() {
        let mut alphabet = Alphabet::new();
        let a3 = timbuk::parse_into(A3, &mut alphabet).unwrap();
        let a4 = timbuk::parse_into(A4, &mut alphabet).unwrap();
        assert!(check_inclusion(&a3.aut, &a4.aut, &params), "{:?}", params);
        assert!(!check_inclusion(&a4.aut, &a3.aut, &params), "{:?}", params);
    }
}

#[test]
fn test_reduce_keeps_language() {
    let text = "Ops a:0 b:0 f:2
Automaton Twins
States x y u v top
Final States top
Transitions
a -> x
b -> x
a -> y
b -> y
f(x,y) -> u
f(y,x) -> v
f(u,v) -> top
f(v,u) -> top
f(x,x) -> top
";
    let reduced = commands::reduce(text).unwrap();
    let mut alphabet = Alphabet::new();
    let original = timbuk::parse_into(text, &mut alphabet).unwrap();
    let smaller = timbuk::parse_into(&reduced, &mut alphabet).unwrap();
    assert_eq!(smaller.aut.state_count(), 3);
    assert_eq!(smaller.dict.state("x"), Some(ta_rs::types::State::new(0)));

    for tree in Tree::enumerate(&alphabet, 4) {
        assert_eq!(original.aut.accepts(&tree), smaller.aut.accepts(&tree), "{}", tree.display(&alphabet));
    }
    assert_eq!(original.aut.count_trees(4), smaller.aut.count_trees(4));
}

#[test]
fn test_round_trip() {
    let (parsed, alphabet) = timbuk::parse(A2).unwrap();
    let text = parsed.to_timbuk(&alphabet);
    let (again, alphabet2) = timbuk::parse(&text).unwrap();
    assert_eq!(again.name, parsed.name);
    assert_eq!(again.aut.state_count(), parsed.aut.state_count());
    assert_eq!(
        again.aut.rules().cloned().collect::<Vec<_>>(),
        parsed.aut.rules().cloned().collect::<Vec<_>>()
    );
    assert_eq!(again.aut.roots().collect::<Vec<_>>(), parsed.aut.roots().collect::<Vec<_>>());
    assert_eq!(again.dict, parsed.dict);
    assert_eq!(alphabet2.len(), alphabet.len());
    assert_eq!(again.to_timbuk(&alphabet2), text);
}

#[test]
fn test_parse_error_aborts() {
    assert!(commands::reduce("Ops a:0\nAutomaton A\nStates q\nFinal States r\nTransitions\n").is_err());
    assert!(commands::check_inclusion(A1, "").is_err());
}
