//! Query tokenizer
//!
//! Whitespace outside quoted literals is insignificant. Every token keeps the
//! byte offset it started at so errors can name the malformed span.

use crate::error::{ObjxError, ObjxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    LParen,
    RParen,
    Comma,
    /// Run of characters other than whitespace, brackets, comma and quotes.
    Word(&'a str),
    /// Quoted literal including its quotes, escapes left verbatim.
    Quoted(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

impl Token<'_> {
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Word(w) => format!("'{w}'"),
            TokenKind::Quoted(q) => q.to_string(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    !(c.is_whitespace() || matches!(c, '(' | ')' | ',' | '"' | '\''))
}

/// Byte length of the quoted literal starting at `start`, quotes included.
pub(crate) fn quoted_len(src: &str, start: usize) -> Option<usize> {
    let mut chars = src[start..].char_indices();
    let (_, quote) = chars.next()?;
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i + c.len_utf8());
        }
    }
    None
}

pub(crate) fn tokenize(src: &str) -> ObjxResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = src[pos..].chars().next() {
        let kind = match c {
            c if c.is_whitespace() => {
                pos += c.len_utf8();
                continue;
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '"' | '\'' => {
                let len = quoted_len(src, pos)
                    .ok_or_else(|| ObjxError::malformed("unterminated quoted literal", pos, src))?;
                tokens.push(Token {
                    kind: TokenKind::Quoted(&src[pos..pos + len]),
                    offset: pos,
                });
                pos += len;
                continue;
            }
            _ => {
                let len = src[pos..]
                    .find(|c: char| !is_word_char(c))
                    .unwrap_or(src.len() - pos);
                tokens.push(Token {
                    kind: TokenKind::Word(&src[pos..pos + len]),
                    offset: pos,
                });
                pos += len;
                continue;
            }
        };
        tokens.push(Token { kind, offset: pos });
        pos += 1;
    }

    Ok(tokens)
}
