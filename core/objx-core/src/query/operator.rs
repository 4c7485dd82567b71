//! Query operators and token normalization

use std::fmt;

/// The six operators of the query DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    GreaterThan,
    LessThan,
    And,
    Or,
    Not,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::And,
        Operator::Or,
        Operator::Not,
    ];

    /// Matches a token case-insensitively, ignoring `_` separators.
    ///
    /// `GREATER_THAN`, `greater_than` and `greaterThan` all parse to
    /// [`Operator::GreaterThan`].
    pub fn parse(token: &str) -> Option<Self> {
        let folded: String = token
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "equal" => Some(Operator::Equal),
            "greaterthan" => Some(Operator::GreaterThan),
            "lessthan" => Some(Operator::LessThan),
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "not" => Some(Operator::Not),
            _ => None,
        }
    }

    /// Canonical lower-camel-case name understood by the engine.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }

    /// Upper-snake-case token, as written in the query grammar.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Equal => "EQUAL",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessThan => "LESS_THAN",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    /// Leaf operators compare one field with one literal.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Equal | Operator::GreaterThan | Operator::LessThan
        )
    }

    /// Group operators combine child expressions.
    pub fn is_logical(&self) -> bool {
        !self.is_comparison()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes an operator token to its canonical camel-case name.
pub fn normalize(token: &str) -> Option<&'static str> {
    Operator::parse(token).map(|op| op.name())
}

/// Lower-cases `token` and rewrites `_`-separated words to lower camel case.
pub fn camel_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut capitalize_next = false;
    for c in token.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// The leading operator token of `query`: everything before the first `(`.
pub(crate) fn leading_token(query: &str) -> &str {
    query.split('(').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_all_spellings() {
        assert_eq!(normalize("GREATER_THAN"), Some("greaterThan"));
        assert_eq!(normalize("greater_than"), Some("greaterThan"));
        assert_eq!(normalize("greaterThan"), Some("greaterThan"));
        assert_eq!(normalize("Less_Than"), Some("lessThan"));
        assert_eq!(normalize("EQUAL"), Some("equal"));
        assert_eq!(normalize("Or"), Some("or"));
        assert_eq!(normalize("select"), None);
    }

    #[test]
    fn tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.token()), Some(op));
            assert_eq!(Operator::parse(op.name()), Some(op));
        }
    }

    #[test]
    fn camel_case_rule() {
        assert_eq!(camel_case("greater_than"), "greaterThan");
        assert_eq!(camel_case("LESS_THAN"), "lessThan");
        assert_eq!(camel_case("equal"), "equal");
    }

    #[test]
    fn comparison_and_logical_split() {
        assert!(Operator::Equal.is_comparison());
        assert!(Operator::LessThan.is_comparison());
        assert!(Operator::Not.is_logical());
        assert!(!Operator::And.is_comparison());
    }

    #[test]
    fn leading_token_stops_at_bracket() {
        assert_eq!(leading_token("  And (equal(a,1))"), "And");
        assert_eq!(leading_token("equal"), "equal");
        assert_eq!(leading_token(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(idx in 0usize..6, upper in any::<bool>()) {
            let op = Operator::ALL[idx];
            let token = if upper { op.token().to_string() } else { op.token().to_lowercase() };
            let once = normalize(&token).unwrap();
            prop_assert_eq!(normalize(once), Some(once));
        }

        #[test]
        fn normalize_ignores_case(idx in 0usize..6, mask in any::<u32>()) {
            let op = Operator::ALL[idx];
            let mixed: String = op
                .token()
                .chars()
                .enumerate()
                .map(|(i, c)| if mask & (1 << (i % 32)) != 0 { c.to_ascii_lowercase() } else { c })
                .collect();
            prop_assert_eq!(normalize(&mixed), Some(op.name()));
        }
    }
}
