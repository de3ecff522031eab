//! # Sprig Template
//!
//! Compiles markup with embedded `{{ }}` expressions and `on*` handler
//! attributes into a [`Template`]: a render function from
//! `(context, value, index)` to a single root [`VNode`](sprig_vdom::VNode).
//!
//! ```ignore
//! let template = sprig_template::compile(r#"<p class="{{ kind }}">Hi {{ name }}</p>"#)?;
//! let node = template.render(&context, &Value::Null, None)?;
//! ```

pub mod attributes;
pub mod compiler;
pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod options;
pub mod segments;
pub mod tree;

#[cfg(test)]
mod tests_compile;

pub use compiler::{compile, Compiler, Template};
pub use error::{CompileError, CompileResult, EvalError, EvalResult, ExprError};
pub use options::CompileOptions;
pub use tree::{is_void_element, VOID_ELEMENTS};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
