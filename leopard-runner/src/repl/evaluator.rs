use gc::Gc;

use leopard_core::ast::Statement;
use leopard_core::ParseError;
use leopard_interpreter::{eval_program, Environment, Object};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, line: &str) -> Self::Object;
}

#[derive(Debug)]
pub enum Evaluation {
    ParseErrors(Vec<ParseError>),
    /// The line held no statements or ended with a `let`.
    Nothing,
    Value(Gc<Object>),
}

/// Evaluates lines one after another against a single environment, so
/// bindings made on one line are visible on the next.
#[derive(Default)]
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Evaluation;

    fn evaluate(&mut self, line: &str) -> Evaluation {
        let (program, errors) = leopard_core::parse_source(line);
        if !errors.is_empty() {
            return Evaluation::ParseErrors(errors);
        }
        let value = eval_program(&program, &self.environment);
        let is_error = matches!(*value, Object::Error(_));
        match program.statements.last() {
            None | Some(Statement::Let(_)) if !is_error => Evaluation::Nothing,
            _ => Evaluation::Value(value),
        }
    }
}
