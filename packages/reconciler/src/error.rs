//! Error types for mounting and event dispatch

use sprig_template::EvalError;
use sprig_vdom::HandlerError;
use thiserror::Error;

pub type MountResult<T> = Result<T, MountError>;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("Component does not implement render()")]
    MissingRenderMethod,

    #[error("Render failed: {0}")]
    Render(#[from] EvalError),

    #[error("Event handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error("No '{event}' handler on the target node")]
    NoHandler { event: String },
}
