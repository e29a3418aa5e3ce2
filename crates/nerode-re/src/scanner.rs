// tokenizer for the pattern language
// only `\ ( ) * |` may follow a backslash, everything else is a literal

use crate::parser::RegexError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meta {
    Alternation,
    Star,
    Open,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Char(char),
    Meta(Meta),
}

impl Meta {
    fn from_char(c: char) -> Option<Meta> {
        match c {
            '|' => Some(Meta::Alternation),
            '*' => Some(Meta::Star),
            '(' => Some(Meta::Open),
            ')' => Some(Meta::Close),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Meta::Alternation => '|',
            Meta::Star => '*',
            Meta::Open => '(',
            Meta::Close => ')',
        }
    }
}

impl Token {
    pub fn is_meta(self, meta: Meta) -> bool {
        self == Token::Meta(meta)
    }
}

pub(crate) fn is_escapable(c: char) -> bool {
    c == '\\' || Meta::from_char(c).is_some()
}

pub fn scan(pattern: &str) -> Result<Vec<Token>, RegexError> {
    let mut tokens: Vec<Token> = Vec::with_capacity(pattern.len());
    let mut escaped = false;

    for c in pattern.chars() {
        if escaped {
            if !is_escapable(c) {
                return Err(RegexError::BadEscapedSymbol(c));
            }
            tokens.push(Token::Char(c));
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if let Some(meta) = Meta::from_char(c) {
            tokens.push(Token::Meta(meta));
        } else {
            tokens.push(Token::Char(c));
        }
    }

    if escaped {
        return Err(RegexError::UnexpectedEnd);
    }

    Ok(tokens)
}
