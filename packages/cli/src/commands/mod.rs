pub mod check;
pub mod render;

pub use check::{check, CheckArgs};
pub use render::{render, RenderArgs};
