//! One-level query grammar
//!
//! Bracket-scanning compiler for stores that must keep the one-level form:
//! a query is either a single leaf or one logical operator over leaves.
//! `))` anywhere in the text selects the group path; siblings are split on
//! `),`. Anything deeper is rejected instead of miscompiled.
//!
//! Structural characters inside quoted literals are ignored, and every
//! reported span is a byte offset into the caller's original text.

use crate::error::{ObjxError, ObjxResult};
use crate::query::ast::Expr;
use crate::query::lexer::quoted_len;
use crate::query::operator::Operator;
use crate::value::unquote;
use std::ops::Range;

/// Query text with insignificant whitespace removed.
///
/// Whitespace is only insignificant next to `(`, `)` and `,` or at either
/// end; a run between two token characters is an error.
struct Squeezed<'q> {
    query: &'q str,
    text: String,
    /// Original byte offset of each byte in `text`.
    origin: Vec<usize>,
    /// Positions of `(`, `)` and `,` outside quoted literals.
    marks: Vec<(usize, u8)>,
}

impl<'q> Squeezed<'q> {
    fn new(query: &'q str) -> ObjxResult<Self> {
        let mut text = String::with_capacity(query.len());
        let mut origin = Vec::with_capacity(query.len());
        let mut marks = Vec::new();
        let mut pos = 0;

        while let Some(c) = query[pos..].chars().next() {
            if c == '"' || c == '\'' {
                let len = quoted_len(query, pos).ok_or_else(|| {
                    ObjxError::malformed("unterminated quoted literal", pos, query)
                })?;
                text.push_str(&query[pos..pos + len]);
                origin.extend(pos..pos + len);
                pos += len;
                continue;
            }
            if c.is_whitespace() {
                let run = query[pos..]
                    .find(|c: char| !c.is_whitespace())
                    .map_or(query.len(), |len| pos + len);
                let before = text.chars().next_back();
                let after = query[run..].chars().next();
                if let (Some(before), Some(after)) = (before, after)
                    && !is_structural(before)
                    && !is_structural(after)
                {
                    return Err(ObjxError::malformed(
                        "unexpected whitespace inside a token",
                        pos,
                        query,
                    ));
                }
                pos = run;
                continue;
            }
            if is_structural(c) {
                marks.push((text.len(), c as u8));
            }
            text.push(c);
            origin.extend(pos..pos + c.len_utf8());
            pos += c.len_utf8();
        }

        Ok(Self {
            query,
            text,
            origin,
            marks,
        })
    }

    fn span(&self, idx: usize) -> usize {
        self.origin.get(idx).copied().unwrap_or(self.query.len())
    }

    fn error(&self, message: impl Into<String>, idx: usize) -> ObjxError {
        ObjxError::malformed(message, self.span(idx), self.query)
    }

    fn marks_in(&self, range: &Range<usize>) -> impl Iterator<Item = (usize, u8)> + '_ {
        let range = range.clone();
        self.marks
            .iter()
            .copied()
            .filter(move |(idx, _)| range.contains(idx))
    }

    fn first(&self, range: &Range<usize>, mark: u8) -> Option<usize> {
        self.marks_in(range).find(|(_, m)| *m == mark).map(|(idx, _)| idx)
    }

    /// `))` outside quoted literals.
    fn has_double_close(&self) -> bool {
        self.marks
            .windows(2)
            .any(|w| w[0].1 == b')' && w[1].1 == b')' && w[1].0 == w[0].0 + 1)
    }

    /// Checks balance and depth; returns the maximum depth.
    fn validate_brackets(&self) -> ObjxResult<usize> {
        let mut open = Vec::new();
        let mut max_depth = 0;
        for (idx, mark) in self.marks.iter().copied() {
            match mark {
                b'(' => {
                    open.push(idx);
                    if open.len() > 2 {
                        return Err(self.error(
                            "nesting deeper than one level is not supported by the shallow grammar",
                            idx,
                        ));
                    }
                    max_depth = max_depth.max(open.len());
                }
                b')' => {
                    if open.pop().is_none() {
                        return Err(self.error("unmatched ')'", idx));
                    }
                }
                _ => {}
            }
        }
        if let Some(idx) = open.first() {
            return Err(self.error("unclosed '('", *idx));
        }
        Ok(max_depth)
    }

    fn operator(&self, range: Range<usize>) -> ObjxResult<Operator> {
        let token = &self.text[range.clone()];
        if token.is_empty() {
            return Err(self.error("missing operator", range.start));
        }
        Operator::parse(token).ok_or_else(|| ObjxError::InvalidOperator {
            token: token.to_string(),
            query: self.query.to_string(),
        })
    }
}

fn is_structural(c: char) -> bool {
    matches!(c, '(' | ')' | ',')
}

/// Compiles query text with the one-level grammar.
pub fn parse(query: &str) -> ObjxResult<Expr> {
    let squeezed = Squeezed::new(query)?;
    let max_depth = squeezed.validate_brackets()?;
    let whole = 0..squeezed.text.len();

    if squeezed.has_double_close() {
        return parse_group(&squeezed, whole);
    }
    if max_depth > 1 {
        let inner = squeezed
            .marks
            .iter()
            .filter(|(_, m)| *m == b'(')
            .nth(1)
            .map(|(idx, _)| *idx)
            .unwrap_or_default();
        return Err(squeezed.error("nested expression must be the last argument", inner));
    }
    parse_leaf(&squeezed, whole)
}

fn parse_group(s: &Squeezed<'_>, range: Range<usize>) -> ObjxResult<Expr> {
    let Some(open) = s.first(&range, b'(') else {
        return Err(s.error("expected '('", range.start));
    };
    let op = s.operator(range.start..open)?;
    if !op.is_logical() {
        return Err(s.error(format!("'{op}' cannot group expressions"), range.start));
    }

    let close = range.end - 1;
    if s.text.as_bytes().get(close) != Some(&b')') {
        return Err(s.error("unexpected input after ')'", range.end));
    }
    let body = open + 1..close;
    if body.is_empty() {
        return Err(s.error(format!("'{op}' needs at least one expression"), open + 1));
    }

    // siblings end at a `)` immediately followed by `,`
    let mut children = Vec::new();
    let mut start = body.start;
    let marks: Vec<(usize, u8)> = s.marks_in(&body).collect();
    for pair in marks.windows(2) {
        let ((close_idx, a), (comma_idx, b)) = (pair[0], pair[1]);
        if a == b')' && b == b',' && comma_idx == close_idx + 1 {
            children.push(parse_leaf(s, start..close_idx + 1)?);
            start = comma_idx + 1;
        }
    }
    children.push(parse_leaf(s, start..body.end)?);

    Ok(Expr::group(op, children))
}

fn parse_leaf(s: &Squeezed<'_>, range: Range<usize>) -> ObjxResult<Expr> {
    if range.is_empty() {
        return Err(s.error("missing expression", range.start));
    }
    let Some(open) = s.first(&range, b'(') else {
        return Err(s.error("expected '(' after operator", range.end));
    };
    if let Some(comma) = s.first(&range, b',')
        && comma < open
    {
        return Err(s.error("expected '(' before ','", comma));
    }

    let op = s.operator(range.start..open)?;
    if !op.is_comparison() {
        return Err(s.error(format!("'{op}' expects nested expressions"), open + 1));
    }

    let Some(close) = s.first(&range, b')') else {
        return Err(s.error("missing ')'", range.end));
    };
    let Some(comma) = s.first(&range, b',').filter(|comma| *comma < close) else {
        return Err(s.error("missing ',' between field and value", close));
    };
    if close != range.end - 1 {
        return Err(s.error("unexpected input after ')'", close + 1));
    }
    if let Some((idx, mark)) = s
        .marks_in(&(open + 1..close))
        .find(|(idx, _)| *idx != comma)
    {
        return Err(s.error(format!("unexpected '{}'", mark as char), idx));
    }

    let field = &s.text[open + 1..comma];
    let value = &s.text[comma + 1..close];
    if field.is_empty() {
        return Err(s.error("empty field name", open + 1));
    }
    if value.is_empty() {
        return Err(s.error("empty value", comma + 1));
    }
    let field = unquote(field).unwrap_or_else(|| field.to_string());

    Ok(Expr::leaf(op, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(query: &str) -> String {
        parse(query).unwrap().to_string()
    }

    fn malformed(query: &str) -> (String, usize) {
        match parse(query).unwrap_err() {
            ObjxError::MalformedExpression { message, span, .. } => (message, span),
            other => panic!("expected MalformedExpression, got {other:?}"),
        }
    }

    #[test]
    fn single_leaf() {
        assert_eq!(compiled(r#"equal(name,"Bob")"#), r#"equal("name","Bob")"#);
        assert_eq!(compiled("GREATER_THAN(price,10)"), r#"greaterThan("price",10)"#);
    }

    #[test]
    fn one_level_group() {
        assert_eq!(
            compiled("and(equal(a,1),greaterThan(b,2))"),
            r#"and(equal("a",1),greaterThan("b",2))"#
        );
        assert_eq!(
            compiled("or(equal(a,1),equal(b,2),less_than(c,3))"),
            r#"or(equal("a",1),equal("b",2),lessThan("c",3))"#
        );
    }

    #[test]
    fn not_over_single_leaf() {
        assert_eq!(compiled("NOT(equal(a,1))"), r#"not(equal("a",1))"#);
    }

    #[test]
    fn whitespace_is_removed_outside_quotes() {
        assert_eq!(
            compiled(r#" and ( equal( name , "Bob Smith" ) , less_than(b, 2) ) "#),
            r#"and(equal("name","Bob Smith"),lessThan("b",2))"#
        );
    }

    #[test]
    fn whitespace_cannot_split_a_token() {
        let (message, span) = malformed("equal(id, 1 2)");
        assert!(message.contains("whitespace"));
        assert_eq!(span, 11);
        assert_eq!(malformed("equal(first name,'x')").1, 11);
        assert_eq!(malformed("greater than(a,1)").1, 7);
        assert_eq!(malformed(r#"equal(a,"x" "y")"#).1, 11);
    }

    #[test]
    fn quoted_brackets_are_not_structure() {
        assert_eq!(
            compiled(r#"and(equal(a,"x),y"),equal(b,"))"))"#),
            r#"and(equal("a","x),y"),equal("b","))"))"#
        );
    }

    #[test]
    fn deeper_nesting_is_rejected() {
        let (message, span) = malformed("and(or(equal(a,1),equal(b,2)),equal(c,3))");
        assert!(message.contains("deeper than one level"));
        assert_eq!(span, 12);
    }

    #[test]
    fn nested_expression_not_last_without_double_close() {
        let (_, span) = malformed("and(equal(a,1),x)");
        assert_eq!(span, 9);
    }

    #[test]
    fn unbalanced_brackets() {
        assert_eq!(malformed("equal(a,1").1, 5);
        assert_eq!(malformed("equal(a,1))").1, 10);
    }

    #[test]
    fn missing_comma() {
        let (message, span) = malformed("equal(a)");
        assert!(message.contains("missing ','"));
        assert_eq!(span, 7);
    }

    #[test]
    fn empty_field_and_value() {
        assert!(malformed("equal(,1)").0.contains("empty field"));
        assert!(malformed("equal(a,)").0.contains("empty value"));
    }

    #[test]
    fn extra_comma_in_leaf() {
        let (message, span) = malformed("equal(a,1,2)");
        assert!(message.contains("unexpected ','"));
        assert_eq!(span, 9);
    }

    #[test]
    fn trailing_input_after_group() {
        assert!(malformed("and(equal(a,1))x").0.contains("after ')'"));
    }

    #[test]
    fn operator_kinds_are_checked() {
        assert!(malformed("equal(equal(a,1))").0.contains("cannot group"));
        assert!(malformed("and(a,1)").0.contains("expects nested"));
        assert!(matches!(
            parse("and(equals(a,1))"),
            Err(ObjxError::InvalidOperator { token, .. }) if token == "equals"
        ));
    }

    #[test]
    fn spans_point_into_original_text() {
        // the space is squeezed out, the span still points at `(`
        let (_, span) = malformed("equal (a");
        assert_eq!(span, 6);
    }
}
