use crate::value::Value;
use std::fmt;
use std::ptr;
use std::rc::Rc;
use thiserror::Error;

pub type HandlerResult<T> = Result<T, HandlerError>;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Receiver has no method '{method}'")]
    UnknownMethod { method: String },

    #[error("Receiver has no field '{field}'")]
    UnknownField { field: String },

    #[error("Field '{field}' is read-only")]
    ReadOnly { field: String },

    #[error("Handler evaluation failed: {0}")]
    Evaluation(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{0}")]
    Custom(String),
}

/// The object bound as `this` while an event handler runs
///
/// Every method has a default that rejects the access, so implementors only
/// override what their handlers use.
pub trait Receiver {
    fn get(&self, field: &str) -> HandlerResult<Value> {
        Err(HandlerError::UnknownField {
            field: field.to_string(),
        })
    }

    fn set(&mut self, field: &str, _value: Value) -> HandlerResult<()> {
        Err(HandlerError::ReadOnly {
            field: field.to_string(),
        })
    }

    fn call(&mut self, method: &str, _args: Vec<Value>) -> HandlerResult<Value> {
        Err(HandlerError::UnknownMethod {
            method: method.to_string(),
        })
    }
}

type HandlerFn = dyn Fn(&mut dyn Receiver) -> HandlerResult<()>;

/// Compiled event handler
///
/// Handlers compare by identity: two handlers are equal only if they are
/// clones of the same closure.
#[derive(Clone)]
pub struct Handler(Rc<HandlerFn>);

impl Handler {
    pub fn new(f: impl Fn(&mut dyn Receiver) -> HandlerResult<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the handler with `receiver` bound as `this`
    pub fn invoke(&self, receiver: &mut dyn Receiver) -> HandlerResult<()> {
        (self.0)(receiver)
    }

    pub fn ptr_eq(&self, other: &Handler) -> bool {
        ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}
