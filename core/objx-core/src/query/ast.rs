//! Query expression tree
//!
//! Rendering an [`Expr`] with `Display` yields the compiled query text:
//! canonical operator names, quoted field names, literals verbatim.

use crate::query::operator::Operator;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `op(field,value)` with a comparison operator.
    Leaf {
        op: Operator,
        field: String,
        /// Raw literal text, e.g. `"Bob"` or `42`.
        value: String,
    },
    /// `op(child,...)` with a logical operator.
    Group { op: Operator, children: Vec<Expr> },
}

impl Expr {
    pub fn leaf(op: Operator, field: impl Into<String>, value: impl Into<String>) -> Self {
        Expr::Leaf {
            op,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn group(op: Operator, children: Vec<Expr>) -> Self {
        Expr::Group { op, children }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Expr::Leaf { op, .. } | Expr::Group { op, .. } => *op,
        }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Leaf { .. } => 1,
            Expr::Group { children, .. } => {
                1 + children.iter().map(Expr::depth).max().unwrap_or(0)
            }
        }
    }

    /// Field names referenced by the expression, left to right.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Leaf { field, .. } => out.push(field),
            Expr::Group { children, .. } => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf { op, field, value } => write!(f, "{op}(\"{field}\",{value})"),
            Expr::Group { op, children } => {
                write!(f, "{op}(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
