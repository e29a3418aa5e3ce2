use crate::{minimize, parse, to_dfa, translate, Automaton, Dfa, Nfa};

fn compile_regex(re_str: &str, quiet: bool) -> (Nfa, Dfa) {
    let ast = parse(re_str).expect("failed to parse regex");
    if !quiet {
        println!("ast = {:?}", ast);
    }

    let nfa = translate(&ast);
    if !quiet {
        println!("nfa = {:?}", nfa);
    }

    let dfa = to_dfa(&nfa);
    if !quiet {
        println!("dfa = {:?}", dfa);
    }

    let dfa = minimize(&dfa);
    if !quiet {
        println!("minimized = {:?}", dfa);
    }

    (nfa, dfa)
}

fn run_vectors(tests: &[(&str, bool)], re_str: &str) {
    let (nfa, dfa) = compile_regex(re_str, false);
    for (test, expected_result) in tests {
        let nfa_result = nfa.matches(test);
        let dfa_result = dfa.matches(test);
        assert_eq!(
            nfa_result, *expected_result,
            "'{}' failed on input '{}' (nfa), expect match: {}, actual match: {}",
            re_str, test, expected_result, nfa_result
        );
        assert_eq!(
            dfa_result, *expected_result,
            "'{}' failed on input '{}' (dfa), expect match: {}, actual match: {}",
            re_str, test, expected_result, dfa_result
        );
    }
}

// every word over `symbols` up to `max_len` characters
fn words(symbols: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix| {
                symbols.iter().map(move |c| {
                    let mut word = prefix.clone();
                    word.push(*c);
                    word
                })
            })
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

const PATTERNS: &[&str] = &[
    "a|b",
    "ab*",
    "d(a|b)e*(g|k)",
    "(ab*)(ab)*",
    "a(b|a|c)d*",
    "aa*a|(aa*)***",
    "(acd(a)*|a)|(ab*|a)",
    "a|a|a|(ab)*",
    "(a)*(a)*",
    "aa",
    "(ab)*",
    "a|(a*b*)*",
    "(a*b)*c",
    "(a|b)*abb",
    "",
];

#[test]
fn alternation() {
    run_vectors(&[("a", true), ("b", true), ("ab", false), ("", false)], "a|b");
}

#[test]
fn trailing_closure() {
    run_vectors(
        &[
            ("a", true),
            ("ab", true),
            ("aab", false),
            ("abb", true),
            ("b", false),
        ],
        "ab*",
    );
}

#[test]
fn grouped_decisions() {
    run_vectors(
        &[
            ("daeg", true),
            ("dbk", true),
            ("dbeeek", true),
            ("dcegk", false),
            ("dag", true),
            ("dabg", false),
        ],
        "d(a|b)e*(g|k)",
    );
}

#[test]
fn closure_of_group() {
    run_vectors(
        &[
            ("a", true),
            ("aab", true),
            ("abbab", true),
            ("abb", true),
            ("abaa", false),
            ("", false),
        ],
        "(ab*)(ab)*",
    );
}

#[test]
fn alternation_chain_with_closure() {
    run_vectors(
        &[
            ("abdddd", true),
            ("aadd", true),
            ("acd", true),
            ("add", false),
            ("ab", true),
            ("acc", false),
        ],
        "a(b|a|c)d*",
    );
}

#[test]
fn escaped_symbols() {
    run_vectors(
        &[("*", true), ("**(", true), ("(", true), ("a", false), ("", false)],
        r"\**\(|\*",
    );
}

#[test]
fn empty_pattern() {
    run_vectors(&[("", true), ("a", false), ("ab", false)], "");
}

#[test]
fn nfa_and_minimized_dfa_agree() {
    for pattern in PATTERNS {
        let (nfa, dfa) = compile_regex(pattern, true);
        let mut symbols: Vec<char> = nfa.alphabet().into_iter().collect();
        symbols.push('z');

        for word in words(&symbols, 5) {
            assert_eq!(
                nfa.matches(&word),
                dfa.matches(&word),
                "'{}' disagrees on input '{}'",
                pattern,
                word
            );
        }
    }
}

#[test]
fn unminimized_dfa_agrees() {
    for pattern in PATTERNS {
        let nfa = translate(&parse(pattern).unwrap());
        let dfa = to_dfa(&nfa);
        let symbols: Vec<char> = nfa.alphabet().into_iter().collect();

        for word in words(&symbols, 5) {
            assert_eq!(nfa.matches(&word), dfa.matches(&word), "'{}' on '{}'", pattern, word);
        }
    }
}

#[test]
fn minimization_is_idempotent() {
    for pattern in PATTERNS {
        let dfa = to_dfa(&translate(&parse(pattern).unwrap()));
        let once = minimize(&dfa);
        let twice = minimize(&once);
        assert!(once.size() <= dfa.size(), "'{}'", pattern);
        assert_eq!(once.size(), twice.size(), "'{}'", pattern);
    }
}

#[test]
fn minimal_state_counts() {
    let counts = [("a|b", 2), ("ab*", 2), ("a*", 1), ("", 1), ("(a|b)*abb", 4)];
    for (pattern, expected) in counts {
        let (_, dfa) = compile_regex(pattern, true);
        assert_eq!(dfa.size(), expected, "'{}'", pattern);
    }
}

#[test]
fn nested_stars_build_identical_automata() {
    let (nfa_a, _) = compile_regex("a**", true);
    let (nfa_b, _) = compile_regex("a*", true);
    assert_eq!(nfa_a, nfa_b);
}
