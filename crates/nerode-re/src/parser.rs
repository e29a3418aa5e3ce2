// pattern grammar (EBNF)
// <expr> ::= <term> { '|' <term> }
// <term> ::= <factor> { <factor> }
// <factor> ::= <atom> { '*' }
// <atom> ::= <literal>
// |  '(' <expr> ')'
// <literal> ::= any char except \ ( ) * |
// |  '\' ( '\' | '(' | ')' | '*' | '|' )
//
// a window of tokens is cut at every '|' outside of parenthesis, every term is
// cut into factors, and both chains are folded to the right, so `abc` is
// a(bc) and `a|b|c` is a|(b|c). only groups recurse.

use std::str::FromStr;

use thiserror::Error;

use crate::ast::{Ast, Node};
use crate::scanner::{scan, Meta, Token};

// parenthesis nested deeper than this are rejected before parsing
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("\\{0} is not an escapable symbol")]
    BadEscapedSymbol(char),
    #[error("pattern ends with an unfinished escape")]
    UnexpectedEnd,
    #[error("unbalanced parenthesis")]
    Parenthesis,
    #[error("empty subexpression")]
    EmptySubExpression,
    #[error("operator '{0}' found where an operand is expected")]
    UnexpectedOperator(char),
    #[error("parenthesis nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

// deepest parenthesis nesting, None when the running count doesn't end at zero
fn nesting(tokens: &[Token]) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut deepest: i64 = 0;
    for token in tokens {
        if token.is_meta(Meta::Open) {
            depth += 1;
            deepest = deepest.max(depth);
        } else if token.is_meta(Meta::Close) {
            depth -= 1;
        }
    }

    (depth == 0).then_some(deepest as usize)
}

// windows between the '|' found outside of any parenthesis
fn alternatives(tokens: &[Token]) -> Vec<&[Token]> {
    let mut windows = Vec::new();
    let mut depth: i64 = 0;
    let mut begin = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Meta(Meta::Open) => depth += 1,
            Token::Meta(Meta::Close) => depth -= 1,
            Token::Meta(Meta::Alternation) if depth == 0 => {
                windows.push(&tokens[begin..i]);
                begin = i + 1;
            }
            _ => (),
        }
    }
    windows.push(&tokens[begin..]);

    windows
}

// tokens[0] must be '('
fn matching_close(tokens: &[Token]) -> Option<usize> {
    let mut depth: i64 = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_meta(Meta::Open) {
            depth += 1;
        } else if token.is_meta(Meta::Close) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

// first factor of a term: a literal or a whole group, then any run of stars
// returns the factor and the number of tokens it spans
fn next_factor(tokens: &[Token]) -> Result<(Node, usize), RegexError> {
    let (mut factor, mut pos) = match tokens.first() {
        None | Some(Token::Meta(Meta::Star)) => return Err(RegexError::EmptySubExpression),
        Some(Token::Char(c)) => (Node::Value(*c), 1),
        Some(Token::Meta(Meta::Open)) => {
            let close = matching_close(tokens).ok_or(RegexError::Parenthesis)?;
            (parse_node(&tokens[1..close])?, close + 1)
        }
        Some(Token::Meta(meta)) => return Err(RegexError::UnexpectedOperator(meta.as_char())),
    };

    if pos < tokens.len() && tokens[pos].is_meta(Meta::Star) {
        while pos < tokens.len() && tokens[pos].is_meta(Meta::Star) {
            pos += 1;
        }
        factor = Node::clini(factor);
    }

    Ok((factor, pos))
}

// [x, y, z] becomes join(x, join(y, z))
fn fold_right(nodes: Vec<Node>, join: fn(Node, Node) -> Node) -> Option<Node> {
    let mut nodes = nodes.into_iter().rev();
    let last = nodes.next()?;
    Some(nodes.fold(last, |right, left| join(left, right)))
}

fn parse_term(tokens: &[Token]) -> Result<Node, RegexError> {
    let mut factors: Vec<Node> = Vec::new();
    let mut rest = tokens;
    while !rest.is_empty() {
        let (factor, used) = next_factor(rest)?;
        factors.push(factor);
        rest = &rest[used..];
    }

    fold_right(factors, Node::concatenation).ok_or(RegexError::EmptySubExpression)
}

fn parse_node(tokens: &[Token]) -> Result<Node, RegexError> {
    match tokens {
        [] | [Token::Meta(Meta::Star)] => return Err(RegexError::EmptySubExpression),
        [Token::Meta(meta)] => return Err(RegexError::UnexpectedOperator(meta.as_char())),
        _ => (),
    }

    let terms = alternatives(tokens)
        .into_iter()
        .map(parse_term)
        .collect::<Result<Vec<Node>, RegexError>>()?;

    fold_right(terms, Node::decision).ok_or(RegexError::EmptySubExpression)
}

// collapses nested closures, (x*)* accepts the same words as x*
// a closure stays a closure after collapsing, so a top-down pass is enough
fn optimize(root: &mut Node) {
    let mut pending: Vec<&mut Node> = vec![root];
    while let Some(node) = pending.pop() {
        while let Node::Clini(child) = node {
            if !matches!(**child, Node::Clini(_)) {
                break;
            }
            let inner = std::mem::replace(child.as_mut(), Node::Value('\0'));
            *node = inner;
        }

        match node {
            Node::Value(_) => (),
            Node::Clini(child) => pending.push(child.as_mut()),
            Node::Concatenation(left, right) | Node::Decision(left, right) => {
                pending.push(right.as_mut());
                pending.push(left.as_mut());
            }
        }
    }
}

impl Ast {
    pub fn parse(pattern: &str) -> Result<Ast, RegexError> {
        let tokens = scan(pattern)?;

        match nesting(&tokens) {
            None => return Err(RegexError::Parenthesis),
            Some(depth) if depth > MAX_NESTING => {
                return Err(RegexError::NestingTooDeep(MAX_NESTING))
            }
            Some(_) => (),
        }

        if tokens.is_empty() {
            return Ok(Ast::new(None));
        }

        let mut root = parse_node(&tokens)?;
        optimize(&mut root);
        Ok(Ast::new(Some(root)))
    }
}

impl FromStr for Ast {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ast::parse(s)
    }
}
