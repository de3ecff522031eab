//! Expression evaluation against a render scope

use crate::compiler::Template;
use crate::error::{EvalError, EvalResult};
use crate::expr::{BinaryOp, Expr, Statement, UnaryOp};
use sprig_vdom::{Receiver, Value};
use std::collections::BTreeMap;
use tracing::trace;

/// Names visible to an expression
///
/// Identifiers resolve against context fields, then `value`, then `index`,
/// then registered partials.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub context: &'a Value,
    pub value: &'a Value,
    pub index: Option<usize>,
    pub partials: &'a BTreeMap<String, Template>,
}

/// Owned copy of a render scope, captured by compiled handlers
#[derive(Debug)]
pub struct OwnedScope {
    context: Value,
    value: Value,
    index: Option<usize>,
    template: Template,
}

impl OwnedScope {
    pub fn capture(scope: &Scope<'_>, template: &Template) -> Self {
        Self {
            context: scope.context.clone(),
            value: scope.value.clone(),
            index: scope.index,
            template: template.clone(),
        }
    }

    pub fn scope(&self) -> Scope<'_> {
        Scope {
            context: &self.context,
            value: &self.value,
            index: self.index,
            partials: self.template.partials(),
        }
    }
}

enum Binding<'a> {
    Value(Value),
    Partial(&'a Template),
    Missing,
}

impl<'a> Scope<'a> {
    fn resolve(&self, name: &str) -> Binding<'a> {
        if let Some(field) = self.context.get(name) {
            return Binding::Value(field.clone());
        }
        match name {
            "value" => return Binding::Value(self.value.clone()),
            "index" => return Binding::Value(self.index.map_or(Value::Null, Value::from)),
            _ => {}
        }
        match self.partials.get(name) {
            Some(partial) => Binding::Partial(partial),
            None => Binding::Missing,
        }
    }

    pub fn lookup(&self, name: &str) -> Value {
        match self.resolve(name) {
            Binding::Value(value) => value,
            Binding::Partial(_) | Binding::Missing => Value::Null,
        }
    }
}

pub struct Evaluator<'s, 'r> {
    scope: Scope<'s>,
    receiver: Option<&'r mut dyn Receiver>,
}

impl<'s, 'r> Evaluator<'s, 'r> {
    pub fn new(scope: Scope<'s>) -> Self {
        Self {
            scope,
            receiver: None,
        }
    }

    /// Evaluator for handler bodies, with `receiver` bound as `this`
    pub fn with_receiver(scope: Scope<'s>, receiver: &'r mut dyn Receiver) -> Self {
        Self {
            scope,
            receiver: Some(receiver),
        }
    }

    pub fn execute(&mut self, statements: &[Statement]) -> EvalResult<()> {
        for statement in statements {
            match statement {
                Statement::Expression(expr) => {
                    self.evaluate(expr)?;
                }
                Statement::Assign { field, value, pos } => {
                    let value = self.evaluate(value)?;
                    trace!(field = %field, "assigning receiver field");
                    self.receiver(*pos)?
                        .set(field, value)
                        .map_err(|e| receiver_error(e, *pos))?;
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),

            Expr::Variable { name, .. } => Ok(self.scope.lookup(name)),

            Expr::This { pos } => Err(EvalError::InvalidThis { pos: *pos }),

            Expr::Member {
                object,
                property,
                pos,
            } => {
                if let Expr::This { .. } = **object {
                    return self
                        .receiver(*pos)?
                        .get(property)
                        .map_err(|e| receiver_error(e, *pos));
                }

                let target = self.evaluate(object)?;
                Ok(member(&target, property))
            }

            Expr::Index { object, index, .. } => {
                let target = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                Ok(index_value(&target, &index))
            }

            Expr::Call {
                callee,
                arguments,
                pos,
            } => self.evaluate_call(callee, arguments, *pos),

            Expr::Unary {
                operator,
                operand,
                pos,
            } => {
                let operand = self.evaluate(operand)?;
                match operator {
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                    UnaryOp::Negate => match operand {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(EvalError::InvalidOperands {
                            operator: "-".to_string(),
                            details: format!("Expected -number, got -{}", other.type_name()),
                            pos: *pos,
                        }),
                    },
                }
            }

            Expr::Binary {
                left,
                operator: BinaryOp::And,
                right,
                ..
            } => {
                let left = self.evaluate(left)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate(right)
            }

            Expr::Binary {
                left,
                operator: BinaryOp::Or,
                right,
                ..
            } => {
                let left = self.evaluate(left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate(right)
            }

            Expr::Binary {
                left,
                operator,
                right,
                pos,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(*operator, left, right, *pos)
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate(test)?.is_truthy() {
                    self.evaluate(consequent)
                } else {
                    self.evaluate(alternate)
                }
            }
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, arguments: &[Expr], pos: usize) -> EvalResult<Value> {
        match callee {
            Expr::Member {
                object, property, ..
            } => {
                if let Expr::This { .. } = **object {
                    let args = self.evaluate_arguments(arguments)?;
                    trace!(method = %property, "calling receiver method");
                    return self
                        .receiver(pos)?
                        .call(property, args)
                        .map_err(|e| receiver_error(e, pos));
                }

                let target = self.evaluate(object)?;
                self.call_method(target, property, arguments, pos)
            }

            Expr::Variable { name, .. } => {
                match self.scope.resolve(name) {
                    Binding::Partial(partial) => {
                        let args = self.evaluate_arguments(arguments)?;
                        let value = args.first().cloned().unwrap_or_default();
                        let index = args.get(1).and_then(as_index);
                        return partial.render_value(&value, index).map(Value::Node);
                    }
                    Binding::Value(_) => {
                        return Err(EvalError::NotCallable {
                            name: name.clone(),
                            pos,
                        })
                    }
                    Binding::Missing => {}
                }

                let args = self.evaluate_arguments(arguments)?;
                let first = args.into_iter().next().unwrap_or_default();
                match name.as_str() {
                    "String" => Ok(Value::String(first.to_string())),
                    "Number" => Ok(Value::Number(first.to_number())),
                    _ => Err(EvalError::UnknownFunction {
                        name: name.clone(),
                        pos,
                    }),
                }
            }

            _ => Err(EvalError::NotCallable {
                name: "expression".to_string(),
                pos,
            }),
        }
    }

    fn call_method(
        &mut self,
        target: Value,
        method: &str,
        arguments: &[Expr],
        pos: usize,
    ) -> EvalResult<Value> {
        match (&target, method) {
            (Value::Array(items), "map") => {
                let partial = self.partial_argument(arguments, pos)?;
                let nodes = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| partial.render_value(item, Some(i)).map(Value::Node))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Array(nodes))
            }

            (Value::Array(items), "join") => {
                let args = self.evaluate_arguments(arguments)?;
                let separator = match args.first() {
                    Some(Value::Null) | None => ",".to_string(),
                    Some(sep) => sep.to_string(),
                };
                let joined = items
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(&separator);
                Ok(Value::String(joined))
            }

            (Value::String(s), "toUpperCase") => Ok(Value::String(s.to_uppercase())),
            (Value::String(s), "toLowerCase") => Ok(Value::String(s.to_lowercase())),
            (Value::String(s), "trim") => Ok(Value::String(s.trim().to_string())),

            _ => Err(EvalError::UnknownMethod {
                method: method.to_string(),
                type_name: target.type_name(),
                pos,
            }),
        }
    }

    /// The single argument of `map`, which must name a partial
    fn partial_argument(&self, arguments: &[Expr], pos: usize) -> EvalResult<&'s Template> {
        match arguments {
            [Expr::Variable { name, .. }] => match self.scope.resolve(name) {
                Binding::Partial(partial) => Ok(partial),
                Binding::Value(_) | Binding::Missing => Err(EvalError::NotCallable {
                    name: name.clone(),
                    pos,
                }),
            },
            _ => Err(EvalError::TypeError {
                message: "map() expects the name of a partial".to_string(),
                pos,
            }),
        }
    }

    fn evaluate_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Value>> {
        arguments.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn receiver(&mut self, pos: usize) -> EvalResult<&mut dyn Receiver> {
        match self.receiver.as_deref_mut() {
            Some(receiver) => Ok(receiver),
            None => Err(EvalError::InvalidThis { pos }),
        }
    }
}

fn receiver_error(error: sprig_vdom::HandlerError, pos: usize) -> EvalError {
    EvalError::Receiver {
        message: error.to_string(),
        pos,
    }
}

fn as_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
        _ => None,
    }
}

fn member(target: &Value, property: &str) -> Value {
    match (target, property) {
        (Value::Array(items), "length") => Value::from(items.len()),
        (Value::String(s), "length") => Value::from(s.chars().count()),
        (Value::Object(map), _) => map.get(property).cloned().unwrap_or_default(),
        _ => Value::Null,
    }
}

fn index_value(target: &Value, index: &Value) -> Value {
    match (target, index) {
        (Value::Array(items), _) => as_index(index)
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or_default(),
        (Value::String(s), _) => as_index(index)
            .and_then(|i| s.chars().nth(i))
            .map_or(Value::Null, |c| Value::String(c.to_string())),
        (Value::Object(_), Value::String(key)) => member(target, key),
        (Value::Object(_), other) => member(target, &other.to_string()),
        _ => Value::Null,
    }
}

fn binary(operator: BinaryOp, left: Value, right: Value, pos: usize) -> EvalResult<Value> {
    let invalid = |left: &Value, right: &Value| EvalError::InvalidOperands {
        operator: operator.symbol().to_string(),
        details: format!(
            "Cannot apply {} to {} and {}",
            operator.symbol(),
            left.type_name(),
            right.type_name()
        ),
        pos,
    };

    match operator {
        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            _ => Err(invalid(&left, &right)),
        },

        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => {
            let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
                return Err(invalid(&left, &right));
            };
            match operator {
                BinaryOp::Subtract => Ok(Value::Number(a - b)),
                BinaryOp::Multiply => Ok(Value::Number(a * b)),
                _ if *b == 0.0 => Err(EvalError::DivisionByZero { pos }),
                BinaryOp::Divide => Ok(Value::Number(a / b)),
                _ => Ok(Value::Number(a % b)),
            }
        }

        BinaryOp::Equals => Ok(Value::Bool(left == right)),
        BinaryOp::NotEquals => Ok(Value::Bool(left != right)),

        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(invalid(&left, &right)),
            };
            // NaN compares false both ways
            let result = ordering.is_some_and(|ordering| match operator {
                BinaryOp::LessThan => ordering.is_lt(),
                BinaryOp::LessThanOrEqual => ordering.is_le(),
                BinaryOp::GreaterThan => ordering.is_gt(),
                _ => ordering.is_ge(),
            });
            Ok(Value::Bool(result))
        }

        // Short-circuiting operators are handled before operands are evaluated
        BinaryOp::And | BinaryOp::Or => Err(invalid(&left, &right)),
    }
}
