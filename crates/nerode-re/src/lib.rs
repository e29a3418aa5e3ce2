mod ast;
mod automaton;
mod dfa;
mod minimize;
mod nfa;
mod parser;
pub mod scanner;
pub mod suite;
mod table;

#[cfg(test)]
mod fa_tests;

pub use ast::{Ast, Node};
pub use automaton::{Automaton, Runner};
pub use dfa::{Dfa, DfaNode};
pub use nfa::{Nfa, NfaNode};
pub use parser::{RegexError, MAX_NESTING};
pub use table::DfaTable;

pub fn parse(pattern: &str) -> Result<Ast, RegexError> {
    Ast::parse(pattern)
}

pub fn translate(ast: &Ast) -> Nfa {
    Nfa::from_ast(ast)
}

pub fn to_dfa(nfa: &Nfa) -> Dfa {
    Dfa::from_nfa(nfa)
}

pub fn minimize(dfa: &Dfa) -> Dfa {
    Dfa::minimize(dfa)
}

pub fn is_match<A: Automaton>(automaton: &A, word: &str) -> bool {
    automaton.matches(word)
}

// convenience function to parse, build the NFA, determinize, then minimize
pub fn compile(pattern: &str) -> Result<Dfa, RegexError> {
    let ast = parse(pattern)?;
    Ok(minimize(&to_dfa(&translate(&ast))))
}
