use std::io::Write;
use std::path::Path;

use leopard_core::ast::Statement;
use leopard_interpreter::{eval_program, Environment, Object};

use crate::error::{Result, RunnerError};

pub fn execute_file(path: &Path, out: &mut impl Write) -> Result<()> {
    let source = std::fs::read_to_string(path).map_err(|source| RunnerError::Read {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("running {} ({} bytes)", path.display(), source.len());
    execute(&source, out)
}

/// Runs a whole program in a fresh environment and writes its final value,
/// unless that value is null or comes from a trailing `let`.
pub fn execute(source: &str, out: &mut impl Write) -> Result<()> {
    let (program, errors) = leopard_core::parse_source(source);
    if !errors.is_empty() {
        return Err(RunnerError::Parse(errors));
    }

    let env = Environment::new();
    let evaluated = eval_program(&program, &env);
    let ends_with_let = matches!(program.statements.last(), Some(Statement::Let(_)));
    match &*evaluated {
        Object::Error(error) => Err(RunnerError::Evaluation(error.clone())),
        Object::Null => Ok(()),
        _ if ends_with_let => Ok(()),
        value => {
            writeln!(out, "{}", value)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::error::RunnerError;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (Result<(), RunnerError>, String) {
        let mut out = Vec::new();
        let result = execute(source, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prints_final_value() {
        let (result, output) = run("let add = fn(a, b) { a + b }; add(1, 2)");

        assert!(result.is_ok());
        assert_eq!(output, "3\n");
    }

    #[test]
    fn test_null_result_prints_nothing() {
        let (result, output) = run("if (false) { 1 }");

        assert!(result.is_ok());
        assert_eq!(output, "");
    }

    #[test]
    fn test_trailing_let_prints_nothing() {
        let (result, output) = run("let x = 1; let y = x + 1;");

        assert!(result.is_ok());
        assert_eq!(output, "");
    }

    #[test]
    fn test_parse_errors_are_returned() {
        let (result, output) = run("let x 5; let = 1;");

        match result {
            Err(RunnerError::Parse(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected parse errors, got {:?}", other),
        }
        assert_eq!(output, "");
    }

    #[test]
    fn test_evaluation_error_is_returned() {
        let (result, output) = run("let a = 1; a + true");

        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("type mismatch: INTEGER + BOOLEAN".to_owned())
        );
        assert_eq!(output, "");
    }
}
