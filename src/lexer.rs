//! Lexical analysis: turns the raw source text into a flat vector of tokens.
//!
//! The lexer is deliberately forgiving: an unrecognised byte becomes an
//! `Invalid` token instead of an error, and the parser rejects it later if a
//! structural token was required at that position. Multi-character operators
//! (`<=`, `==`) are matched before their single-character prefixes.

use std::fmt;

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Label,
    Int,
    Input,
    Output,
    Goto,
    If,
    Then,
    Equal,
    DoubleEqual,
    Plus,
    Minus,
    Mul,
    LessThan,
    LessThanEqual,
    Invalid,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Ident => "ident",
            TokenKind::Label => "label",
            TokenKind::Int => "int",
            TokenKind::Input => "input",
            TokenKind::Output => "output",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Equal => "equal",
            TokenKind::DoubleEqual => "doubleequal",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Mul => "mul",
            TokenKind::LessThan => "lessthan",
            TokenKind::LessThanEqual => "lessthanequal",
            TokenKind::Invalid => "invalid",
            TokenKind::End => "end",
        };
        f.write_str(name)
    }
}

/// A single token: its kind, the source text it captured (empty for kinds
/// that carry no value) and the byte offset of its first character, used by
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, offset: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            offset,
        }
    }

    fn with_text(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.text)
        }
    }
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Lex the source into a token vector terminated by exactly one `End` marker.
///
/// Deterministic and infallible: lexical problems are deferred as `Invalid`
/// tokens rather than reported here.
pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        match c {
            b'=' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::new(TokenKind::DoubleEqual, i));
                i += 2;
            }
            b'=' => {
                tokens.push(Token::new(TokenKind::Equal, i));
                i += 1;
            }
            b'<' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::new(TokenKind::LessThanEqual, i));
                i += 2;
            }
            b'<' => {
                tokens.push(Token::new(TokenKind::LessThan, i));
                i += 1;
            }
            b'+' => {
                tokens.push(Token::new(TokenKind::Plus, i));
                i += 1;
            }
            b'-' => {
                tokens.push(Token::new(TokenKind::Minus, i));
                i += 1;
            }
            b'*' => {
                tokens.push(Token::new(TokenKind::Mul, i));
                i += 1;
            }
            b':' => {
                // The colon is not part of the label value.
                let start = i;
                i += 1;
                let body = i;
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::with_text(TokenKind::Label, &source[body..i], start));
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                tokens.push(Token::with_text(TokenKind::Int, &source[start..i], start));
            }
            _ if is_ident_char(c) => {
                let start = i;
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                let text = &source[start..i];
                let token = match text {
                    "input" => Token::new(TokenKind::Input, start),
                    "output" => Token::new(TokenKind::Output, start),
                    "goto" => Token::new(TokenKind::Goto, start),
                    "if" => Token::new(TokenKind::If, start),
                    "then" => Token::new(TokenKind::Then, start),
                    _ => Token::with_text(TokenKind::Ident, text, start),
                };
                tokens.push(token);
            }
            _ => {
                let text = String::from_utf8_lossy(&bytes[i..i + 1]).into_owned();
                tokens.push(Token::with_text(TokenKind::Invalid, text, i));
                i += 1;
            }
        }
    }

    tokens.push(Token::new(TokenKind::End, source.len()));
    tokens
}
