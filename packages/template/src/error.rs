//! Error types for the Sprig template compiler

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;
pub type EvalResult<T> = Result<T, EvalError>;

/// Syntax error inside a `{{ }}` expression or an event handler body.
///
/// Positions are byte offsets into the full markup source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of expression at {pos}: expected {expected}")]
    UnexpectedEnd { pos: usize, expected: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },

    #[error("Invalid assignment target at {pos}: only `this.field` can be assigned")]
    InvalidAssignment { pos: usize },
}

impl ExprError {
    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_end(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEnd {
            pos,
            expected: expected.into(),
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            ExprError::UnexpectedToken { pos, .. }
            | ExprError::UnexpectedEnd { pos, .. }
            | ExprError::LexerError { pos }
            | ExprError::InvalidAssignment { pos } => *pos,
        }
    }
}

/// Markup that cannot be turned into a render function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unexpected closing tag </{tag}> at {pos}")]
    UnexpectedCloseTag { tag: String, pos: usize },

    #[error("Mismatched closing tag at {pos}: expected </{expected}>, found </{found}>")]
    MismatchedCloseTag {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("Unclosed tag <{tag}> opened at {pos}")]
    UnclosedTag { tag: String, pos: usize },

    #[error("Template contains no element")]
    EmptyTemplate,

    #[error("Invalid expression `{text}`: {error}")]
    Expression {
        text: String,
        #[source]
        error: ExprError,
    },

    #[error("Invalid handler in attribute '{attr}': {error}")]
    Handler {
        attr: String,
        #[source]
        error: ExprError,
    },
}

impl CompileError {
    pub fn pos(&self) -> Option<usize> {
        match self {
            CompileError::UnexpectedCloseTag { pos, .. }
            | CompileError::MismatchedCloseTag { pos, .. }
            | CompileError::UnclosedTag { pos, .. } => Some(*pos),
            CompileError::EmptyTemplate => None,
            CompileError::Expression { error, .. } | CompileError::Handler { error, .. } => {
                Some(error.pos())
            }
        }
    }
}

/// Failure while evaluating an expression at render or handler time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid operands for operator {operator} at {pos}: {details}")]
    InvalidOperands {
        operator: String,
        details: String,
        pos: usize,
    },

    #[error("Division by zero at {pos}")]
    DivisionByZero { pos: usize },

    #[error("Type error at {pos}: {message}")]
    TypeError { message: String, pos: usize },

    #[error("'{name}' is not callable at {pos}")]
    NotCallable { name: String, pos: usize },

    #[error("Unknown function '{name}' at {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("Unknown method '{method}' on {type_name} at {pos}")]
    UnknownMethod {
        method: String,
        type_name: &'static str,
        pos: usize,
    },

    #[error("`this` is only available for field access and method calls inside event handlers (at {pos})")]
    InvalidThis { pos: usize },

    #[error("Receiver error at {pos}: {message}")]
    Receiver { message: String, pos: usize },
}

/// Pretty-print a compile error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &CompileError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let start = error
        .pos()
        .unwrap_or(source.len().saturating_sub(1))
        .min(source.len());
    let end = (start + 1).min(source.len()).max(start);

    let label = match error {
        CompileError::Expression { error, .. } | CompileError::Handler { error, .. } => {
            error.to_string()
        }
        other => other.to_string(),
    };

    let report = Report::build(ReportKind::Error, filename, start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_color(Color::Red)
                .with_message(label),
        )
        .finish();

    let mut output = Vec::new();
    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
