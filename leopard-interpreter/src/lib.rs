//! Tree-walking evaluator for Leopard programs parsed by `leopard_core`.

pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod object;

pub use environment::Environment;
pub use evaluator::{eval, eval_program, Node};
pub use object::{EvaluationError, Object};
