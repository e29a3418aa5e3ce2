// pattern test files, one case per line:
//   pattern:word;word;...:word;word;...
// words in the second field must be accepted, words in the third rejected

use std::fmt;

use thiserror::Error;

use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::parser::RegexError;
use crate::Ast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub pattern: String,
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    #[error("line {line}: expected at most 3 ':'-separated fields, found {found}")]
    Fields { line: usize, found: usize },
    #[error("line {line}: there should be at least one word to check")]
    NoWords { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordResult {
    pub word: String,
    pub expected: bool,
    pub nfa: bool,
    pub dfa: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Compiled {
        ast: Ast,
        nfa: Nfa,
        // minimized
        dfa: Dfa,
        results: Vec<WordResult>,
    },
    Failed(RegexError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub pattern: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub cases: Vec<CaseReport>,
}

fn split_words(field: Option<&str>) -> Vec<String> {
    match field {
        Some(field) if !field.is_empty() => field.split(';').map(|x| x.to_string()).collect(),
        _ => Vec::new(),
    }
}

pub fn parse_suite(def_string: &str) -> Result<Vec<Case>, SuiteError> {
    let mut cases = Vec::new();

    for (i, line) in def_string.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() > 3 {
            return Err(SuiteError::Fields {
                line: i + 1,
                found: fields.len(),
            });
        }

        let accepted = split_words(fields.get(1).copied());
        let rejected = split_words(fields.get(2).copied());
        if accepted.is_empty() && rejected.is_empty() {
            return Err(SuiteError::NoWords { line: i + 1 });
        }

        cases.push(Case {
            pattern: fields[0].to_string(),
            accepted,
            rejected,
        });
    }

    Ok(cases)
}

impl WordResult {
    pub fn passed(&self) -> bool {
        self.nfa == self.expected && self.dfa == self.expected
    }
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        match &self.outcome {
            Outcome::Compiled { results, .. } => results.iter().all(|x| x.passed()),
            Outcome::Failed(_) => false,
        }
    }
}

impl Report {
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|x| x.passed())
    }

    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|x| !x.passed()).count()
    }
}

// every word is checked against both the NFA and the minimized DFA
// the automata stay in the report for inspection
pub fn check_case(case: &Case) -> CaseReport {
    let ast = match Ast::parse(&case.pattern) {
        Ok(ast) => ast,
        Err(e) => {
            return CaseReport {
                pattern: case.pattern.clone(),
                outcome: Outcome::Failed(e),
            }
        }
    };

    let nfa = Nfa::from_ast(&ast);
    let dfa = Dfa::minimize(&Dfa::from_nfa(&nfa));

    let expectations = case
        .accepted
        .iter()
        .map(|x| (x, true))
        .chain(case.rejected.iter().map(|x| (x, false)));
    let results = expectations
        .map(|(word, expected)| WordResult {
            word: word.clone(),
            expected,
            nfa: nfa.matches(word),
            dfa: dfa.matches(word),
        })
        .collect();

    CaseReport {
        pattern: case.pattern.clone(),
        outcome: Outcome::Compiled {
            ast,
            nfa,
            dfa,
            results,
        },
    }
}

pub fn run_suite(def_string: &str) -> Result<Report, SuiteError> {
    let cases = parse_suite(def_string)?;
    let cases = cases.iter().map(check_case).collect();
    Ok(Report { cases })
}

// `{:#}` also prints the tree and both automata
impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.pattern)?;
        let (ast, nfa, dfa, results) = match &self.outcome {
            Outcome::Failed(e) => return writeln!(f, "error: {}", e),
            Outcome::Compiled {
                ast,
                nfa,
                dfa,
                results,
            } => (ast, nfa, dfa, results),
        };

        if f.alternate() {
            let nodes = ast.root().map_or(0, |root| root.size());
            writeln!(f, "ast ({} nodes) = {}", nodes, ast)?;
            writeln!(f, "nfa ({} states) = {:?}", nfa.size(), nfa)?;
            writeln!(f, "minimized ({} states) = {:?}", dfa.size(), dfa)?;
        }

        for expected in [true, false] {
            let group: Vec<&WordResult> = results.iter().filter(|x| x.expected == expected).collect();
            if group.is_empty() {
                continue;
            }

            writeln!(f, "Should be {}:", if expected { "True" } else { "False" })?;
            for (j, result) in group.iter().enumerate() {
                let status = if result.passed() { "ok" } else { "FAIL" };
                writeln!(
                    f,
                    "#{:03} {:>5}: {}. [{}]",
                    j,
                    if result.dfa { "True" } else { "False" },
                    result.word,
                    status
                )?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            if f.alternate() {
                writeln!(f, "{:#}", case)?;
            } else {
                writeln!(f, "{}", case)?;
            }
        }

        if self.all_passed() {
            writeln!(f, "All cases passed.")
        } else {
            writeln!(f, "{} of {} cases failed.", self.failures(), self.cases.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields() {
        let cases = parse_suite("a|b:a;b:ab\nab*:a;abb\n\nx::y\n").unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].pattern, "a|b");
        assert_eq!(cases[0].accepted, vec!["a", "b"]);
        assert_eq!(cases[0].rejected, vec!["ab"]);
        assert!(cases[1].rejected.is_empty());
        assert!(cases[2].accepted.is_empty());
        assert_eq!(cases[2].rejected, vec!["y"]);
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(
            parse_suite("a:a:b:c"),
            Err(SuiteError::Fields { line: 1, found: 4 })
        );
        assert_eq!(parse_suite("a\nb::"), Err(SuiteError::NoWords { line: 1 }));
    }

    #[test]
    fn runs_cases() {
        let report = run_suite("a|b:a;b:ab\nab*:a;ab;abb:aab").unwrap();
        assert!(report.all_passed(), "{}", report);
    }

    #[test]
    fn failures_are_reported_per_case() {
        let report = run_suite("((ab):ab\nab:ab:a\nab:a").unwrap();
        assert_eq!(report.cases.len(), 3);
        assert_eq!(
            report.cases[0].outcome,
            Outcome::Failed(RegexError::Parenthesis)
        );
        assert!(report.cases[1].passed());
        assert!(!report.cases[2].passed());
        assert_eq!(report.failures(), 2);
        assert!(report.to_string().contains("2 of 3 cases failed."));
    }

    #[test]
    fn report_keeps_the_automata() {
        let report = run_suite("(a|b)*abb:abb;babb:ab").unwrap();
        match &report.cases[0].outcome {
            Outcome::Compiled { ast, nfa, dfa, .. } => {
                assert_eq!(ast.to_string(), "((a|b))*abb");
                assert!(nfa.matches("aabb"));
                assert_eq!(dfa.size(), 4);
            }
            Outcome::Failed(e) => panic!("unexpected error {}", e),
        }

        let plain = report.to_string();
        let verbose = format!("{:#}", report);
        assert!(!plain.contains("states) ="));
        assert!(verbose.contains("nfa ("));
        assert!(verbose.contains("minimized (4 states) = "));
        assert!(verbose.ends_with("All cases passed.\n"));
    }

    #[test]
    fn long_pattern_does_not_stop_the_batch() {
        let long = "a".repeat(3_000);
        let suite = format!("{}:{}:{}\n((a):a\nb:b", long, long, "a".repeat(2_999));
        let report = run_suite(&suite).unwrap();
        assert_eq!(report.cases.len(), 3);
        assert!(report.cases[0].passed(), "{}", report.cases[0]);
        assert_eq!(report.cases[1].outcome, Outcome::Failed(RegexError::Parenthesis));
        assert!(report.cases[2].passed());
    }
}
