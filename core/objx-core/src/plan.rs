//! Executable queries: an [`Expr`] resolved against an attribute registry
//!
//! Planning is where field names meet the schema: unknown fields and
//! literals that do not fit the attribute type are rejected here, before the
//! collection is touched.

use crate::error::{ObjxError, ObjxResult};
use crate::query::Expr;
use crate::query::Operator;
use crate::query::parser::{DEPTH_CEILING, Dialect, Parser};
use crate::registry::AttributeRegistry;
use crate::value::Value;

/// Query tree with attribute positions and typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutableQuery {
    Equal { attr: usize, value: Value },
    GreaterThan { attr: usize, value: Value },
    LessThan { attr: usize, value: Value },
    And(Vec<ExecutableQuery>),
    Or(Vec<ExecutableQuery>),
    Not(Box<ExecutableQuery>),
}

impl ExecutableQuery {
    /// Resolves an expression tree against `registry`.
    ///
    /// Trees nested deeper than the parser ceiling are refused, so a
    /// hand-built [`Expr`] cannot exhaust the stack here or in the collection.
    pub fn from_expr<R>(expr: &Expr, registry: &AttributeRegistry<R>) -> ObjxResult<Self> {
        Self::resolve(expr, registry, 1)
    }

    fn resolve<R>(expr: &Expr, registry: &AttributeRegistry<R>, depth: usize) -> ObjxResult<Self> {
        if depth > DEPTH_CEILING {
            return Err(ObjxError::engine(
                format!("expression nested deeper than {DEPTH_CEILING} levels"),
                "query planner",
            ));
        }
        match expr {
            Expr::Leaf { op, field, value } => {
                let attr = registry
                    .position(field)
                    .ok_or_else(|| ObjxError::UnknownField {
                        field: field.clone(),
                    })?;
                let attribute = registry
                    .attribute_at(attr)
                    .ok_or_else(|| ObjxError::UnknownField {
                        field: field.clone(),
                    })?;
                let value =
                    Value::coerce_literal(value, attribute.field_type(), attribute.is_nullable())
                        .map_err(|message| ObjxError::engine(message, format!("{op}(\"{field}\")")))?;

                match op {
                    Operator::Equal => Ok(ExecutableQuery::Equal { attr, value }),
                    Operator::GreaterThan => Ok(ExecutableQuery::GreaterThan { attr, value }),
                    Operator::LessThan => Ok(ExecutableQuery::LessThan { attr, value }),
                    other => Err(ObjxError::engine(
                        format!("'{other}' is not a comparison"),
                        expr.to_string(),
                    )),
                }
            }
            Expr::Group { op, children } => {
                if children.is_empty() {
                    return Err(ObjxError::engine(
                        format!("'{op}' needs at least one child"),
                        expr.to_string(),
                    ));
                }
                let mut planned = children
                    .iter()
                    .map(|child| Self::resolve(child, registry, depth + 1))
                    .collect::<ObjxResult<Vec<_>>>()?;

                match op {
                    Operator::And => Ok(ExecutableQuery::And(planned)),
                    Operator::Or => Ok(ExecutableQuery::Or(planned)),
                    Operator::Not if planned.len() == 1 => {
                        Ok(ExecutableQuery::Not(Box::new(planned.remove(0))))
                    }
                    Operator::Not => Err(ObjxError::engine(
                        format!("'not' takes exactly one child, got {}", planned.len()),
                        expr.to_string(),
                    )),
                    other => Err(ObjxError::engine(
                        format!("'{other}' cannot group expressions"),
                        expr.to_string(),
                    )),
                }
            }
        }
    }

    /// Parses the compiled textual form, e.g. `and(equal("a",1),lessThan("b",2))`.
    ///
    /// Syntax errors surface as [`ObjxError::EngineFailure`]; unknown fields
    /// as [`ObjxError::UnknownField`].
    pub fn parse<R>(text: &str, registry: &AttributeRegistry<R>) -> ObjxResult<Self> {
        let expr = Parser::new(text, Dialect::Native)
            .and_then(Parser::parse)
            .map_err(|e| ObjxError::engine(e.to_string(), "native query parser"))?;
        Self::from_expr(&expr, registry)
    }
}
