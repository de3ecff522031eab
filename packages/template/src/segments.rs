//! `{{ expr }}` interpolation splitting for text runs and attribute values

use crate::error::{CompileError, CompileResult};
use crate::expr::{parse_expression, Expr};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Expr(Expr),
}

/// Split `text` (located at byte `base` of the markup) into literal and
/// expression segments.
///
/// An unterminated `{{` is kept as literal text.
pub fn split(text: &str, base: usize) -> CompileResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;
    let mut offset = base;

    while let Some(open) = rest.find(OPEN) {
        let after_open = &rest[open + OPEN.len()..];
        let Some(close) = after_open.find(CLOSE) else {
            break;
        };

        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let source = &after_open[..close];
        let expr_base = offset + open + OPEN.len();
        let expr = parse_expression(source, expr_base).map_err(|error| CompileError::Expression {
            text: source.trim().to_string(),
            error,
        })?;
        segments.push(Segment::Expr(expr));

        let consumed = open + OPEN.len() + close + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}
