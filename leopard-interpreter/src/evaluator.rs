use std::collections::HashMap;
use gc::Gc;

use crate::builtins::lookup_builtin;
use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, HashPair, Object, QuickReturn};
use leopard_core::ast;
use leopard_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

/// Any syntax tree node the evaluator accepts.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a ast::Program),
    Statement(&'a ast::Statement),
    Block(&'a ast::BlockStatement),
    Expression(&'a Expression),
}

/// Evaluates a whole program. A top-level `return` ends the program with its
/// value; an evaluation failure is returned as an [`Object::Error`].
pub fn eval_program(program: &ast::Program, environment: &Environment) -> Gc<Object> {
    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Ok(object) => output = object,
            Err(QuickReturn::Return(value)) => return value,
            Err(QuickReturn::Error(error)) => {
                log::debug!("evaluation failed: {error}");
                return Object::error(error);
            }
        }
    }
    output
}

/// Evaluates a single node. Outside of a program a `return` is not consumed
/// and surfaces as an [`Object::ReturnValue`].
pub fn eval(node: Node<'_>, environment: &Environment) -> Gc<Object> {
    let result = match node {
        Node::Program(program) => return eval_program(program, environment),
        Node::Statement(statement) => eval_statement(statement, environment),
        Node::Block(block) => eval_block_statement(block, environment),
        Node::Expression(expression) => eval_expression(expression, environment),
    };
    result.unwrap_or_else(QuickReturn::into_object)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
        ast::Statement::Block(block) => eval_block_statement(block, environment),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value.clone());
    Ok(value)
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    Err(QuickReturn::Return(value))
}

/// Blocks run in the scope they appear in; only calls open a new scope.
fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_expression(
    expression: &Expression,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.to_string())),
        Expression::ArrayLiteral(elements) => {
            Ok(Object::array(eval_expressions(elements, environment)?))
        }
        Expression::HashLiteral(pairs) => eval_hash_literal(pairs, environment),
        Expression::Identifier(identifier) => eval_identifier(identifier, environment),
        Expression::PrefixOperation(kind, operand) => {
            let right = eval_expression(operand, environment)?;
            Ok(eval_prefix_operation(*kind, right)?)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_infix_operation(*kind, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            Ok(apply_function(&function, arguments)?)
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            Ok(eval_index_expression(left, index)?)
        }
    }
}

fn eval_identifier(
    identifier: &ast::Identifier,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    if let Some(value) = environment.get(&identifier.name) {
        return Ok(value);
    }
    match lookup_builtin(&identifier.name) {
        Some(builtin) => Ok(Object::builtin_function(builtin)),
        None => Err(EvaluationError::UnknownIdentifier(identifier.name.clone()).into()),
    }
}

/// Evaluates left to right, stopping at the first failure.
fn eval_expressions(
    expressions: &[Expression],
    environment: &Environment,
) -> Result<Vec<Gc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment)?);
    }
    Ok(result)
}

fn eval_hash_literal(
    pairs: &[(Expression, Expression)],
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let mut hashmap = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key = eval_expression(key, environment)?;
        let hashed_key = object_to_key(&key)?;
        let value = eval_expression(value, environment)?;
        hashmap.insert(hashed_key, HashPair { key, value });
    }
    Ok(Object::hash(hashmap))
}

fn apply_function(
    function: &Gc<Object>,
    arguments: Vec<Gc<Object>>,
) -> Result<Gc<Object>, EvaluationError> {
    match &**function {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Err(EvaluationError::WrongArgumentCount {
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                });
            }
            log::trace!("calling {}", Object::Function(function.clone()));

            // The call scope hangs off the scope the function was defined in,
            // not off the caller's.
            let call_environment = Environment::new_enclosed(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                call_environment.set(parameter.name.clone(), argument);
            }
            match eval_block_statement(&function.body, &call_environment) {
                Ok(value) | Err(QuickReturn::Return(value)) => Ok(value),
                Err(QuickReturn::Error(error)) => Err(error),
            }
        }
        Object::Builtin(builtin) => {
            log::trace!("calling builtin `{}`", builtin.name);
            (builtin.func)(arguments)
        }
        other => Err(EvaluationError::CallNonFunction(other.object_type())),
    }
}

fn eval_index_expression(
    left: Gc<Object>,
    index: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (&*left, &*index) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Array(_), other) => Err(EvaluationError::IndexingWithNonInteger(
            other.object_type(),
        )),
        (Object::Hash(hash), _) => {
            let hashed_index = object_to_key(&index)?;
            Ok(hash
                .get(&hashed_index)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        (other, _) => Err(EvaluationError::IndexNotSupported(other.object_type())),
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, &*right) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (PrefixOperationKind::Minus, other) => Err(EvaluationError::UnknownPrefixOperator {
            right: other.object_type(),
            operation: kind,
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: Gc<Object>,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, &*left, &*right) {
        (_, Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        // Booleans are singletons, so identity is equality.
        (InfixOperationKind::Equal, Object::Boolean(_), Object::Boolean(_)) => {
            Ok(Object::boolean(Gc::ptr_eq(&left, &right)))
        }
        (InfixOperationKind::NotEqual, Object::Boolean(_), Object::Boolean(_)) => {
            Ok(Object::boolean(!Gc::ptr_eq(&left, &right)))
        }
        (InfixOperationKind::Plus, Object::String(left), Object::String(right)) => {
            Ok(Object::string(format!("{}{}", left, right)))
        }
        _ if left.object_type() != right.object_type() => Err(EvaluationError::TypeMismatch {
            left: left.object_type(),
            right: right.object_type(),
            operation: kind,
        }),
        _ => Err(EvaluationError::UnknownInfixOperator {
            left: left.object_type(),
            right: right.object_type(),
            operation: kind,
        }),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    let result = match kind {
        InfixOperationKind::Plus => Object::integer(left.wrapping_add(right)),
        InfixOperationKind::Minus => Object::integer(left.wrapping_sub(right)),
        InfixOperationKind::Multiply => Object::integer(left.wrapping_mul(right)),
        InfixOperationKind::Divide => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Object::integer(left.wrapping_div(right))
        }
        InfixOperationKind::LessThan => Object::boolean(left < right),
        InfixOperationKind::GreaterThan => Object::boolean(left > right),
        InfixOperationKind::Equal => Object::boolean(left == right),
        InfixOperationKind::NotEqual => Object::boolean(left != right),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use gc::Gc;

    use super::{eval, eval_program, Node};
    use crate::environment::tests::collected_scopes;
    use crate::environment::Environment;
    use crate::object::{EvaluationError, Object, ObjectType};
    use leopard_core::ast::{InfixOperationKind, PrefixOperationKind};
    use leopard_core::parse_source;
    use pretty_assertions::assert_eq;

    fn run(input: &str, environment: &Environment) -> Gc<Object> {
        let (program, errors) = parse_source(input);
        assert!(errors.is_empty(), "input: {input}, errors: {errors:?}");
        eval_program(&program, environment)
    }

    fn test_evaluation(inputs: Vec<(&str, Gc<Object>)>) {
        for (input, output) in inputs {
            let result = run(input, &Environment::new());

            assert_eq!(result, output, "input: {input}");
        }
    }

    fn test_inspect(inputs: Vec<(&str, &str)>) {
        for (input, output) in inputs {
            let result = run(input, &Environment::new());

            assert_eq!(result.to_string(), output, "input: {input}");
        }
    }

    #[test]
    fn test_literal() {
        let inputs = vec![
            ("5;", Object::integer(5)),
            ("true;", Object::boolean(true)),
            ("false;", Object::boolean(false)),
            ("\"hello\";", Object::string("hello".to_owned())),
            ("", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_expressions() {
        let inputs = vec![
            ("--5;", Object::integer(5)),
            ("-10;", Object::integer(-10)),
            ("5 + 5 + 5 + 5 - 10", Object::integer(10)),
            ("2 * 2 * 2 * 2 * 2", Object::integer(32)),
            ("-50 + 100 + -50", Object::integer(0)),
            ("20 + 2 * -10", Object::integer(0)),
            ("50 / 2 * 2 + 10", Object::integer(60)),
            ("3 * (3 * 3) + 10", Object::integer(37)),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::integer(50)),
            ("7 / 2", Object::integer(3)),
            ("-7 / 2", Object::integer(-3)),
            ("9223372036854775807 + 1", Object::integer(i64::MIN)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_boolean_expressions() {
        let inputs = vec![
            ("1 < 2", Object::boolean(true)),
            ("1 > 2", Object::boolean(false)),
            ("1 == 1", Object::boolean(true)),
            ("1 != 1", Object::boolean(false)),
            ("true == true", Object::boolean(true)),
            ("false == false", Object::boolean(true)),
            ("true == false", Object::boolean(false)),
            ("true != false", Object::boolean(true)),
            ("(1 < 2) == true", Object::boolean(true)),
            ("(1 > 2) == true", Object::boolean(false)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_bang_operator() {
        let inputs = vec![
            ("!true", Object::boolean(false)),
            ("!false", Object::boolean(true)),
            ("!5", Object::boolean(false)),
            ("!!true", Object::boolean(true)),
            ("!!5", Object::boolean(true)),
            ("!\"\"", Object::boolean(false)),
            ("![]", Object::boolean(false)),
            ("!if (false) { 1 }", Object::boolean(true)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_if_else_expressions() {
        let inputs = vec![
            ("if (true) { 10 }", Object::integer(10)),
            ("if (false) { 10 }", Object::null()),
            ("if (1) { 10 }", Object::integer(10)),
            ("if (1 < 2) { 10 }", Object::integer(10)),
            ("if (1 > 2) { 10 }", Object::null()),
            ("if (1 > 2) { 10 } else { 20 }", Object::integer(20)),
            ("if (1 < 2) { 10 } else { 20 }", Object::integer(10)),
            ("if (0) { 10 } else { 20 }", Object::integer(10)),
            ("if (true) { }", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_blocks_share_the_enclosing_scope() {
        let env = Environment::new();
        run("if (true) { let inner = 1; }", &env);

        assert_eq!(env.get("inner"), Some(Object::integer(1)));
    }

    #[test]
    fn test_return_statements() {
        let inputs = vec![
            ("return 10;", Object::integer(10)),
            ("return 10; 9;", Object::integer(10)),
            ("return 2 * 5; 9;", Object::integer(10)),
            ("9; return 2 * 5; 9;", Object::integer(10)),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { return x; x + 10; }; f(10);",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
                Object::integer(20),
            ),
            (
                "let inner = fn() { return 1; }; let outer = fn() { inner(); 2 }; outer()",
                Object::integer(2),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_error_handling() {
        let inputs = vec![
            ("5 + true;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("-true", "ERROR: unknown operator: -BOOLEAN"),
            ("true + false;", "ERROR: unknown operator: BOOLEAN + BOOLEAN"),
            ("true > false;", "ERROR: unknown operator: BOOLEAN > BOOLEAN"),
            ("5; true + false; 5", "ERROR: unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "ERROR: unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "ERROR: unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "ERROR: identifier not found: foobar"),
            ("\"Hello\" - \"World\"", "ERROR: unknown operator: STRING - STRING"),
            ("\"a\" == \"a\"", "ERROR: unknown operator: STRING == STRING"),
            ("1 == true", "ERROR: type mismatch: INTEGER == BOOLEAN"),
            ("\"a\" + 1", "ERROR: type mismatch: STRING + INTEGER"),
            ("[1] + [2]", "ERROR: unknown operator: ARRAY + ARRAY"),
            (
                "{\"name\": \"Leopard\"}[fn(x) { x }];",
                "ERROR: unusable as hash key: FUNCTION",
            ),
            ("{[1]: 2}", "ERROR: unusable as hash key: ARRAY"),
            ("5(1)", "ERROR: not a function: INTEGER"),
            ("\"f\"()", "ERROR: not a function: STRING"),
            ("1[0]", "ERROR: index operator not supported: INTEGER"),
            ("[1][\"0\"]", "ERROR: array index must be INTEGER, got STRING"),
            ("10 / 0", "ERROR: division by zero"),
            (
                "fn(x, y) { x }(1)",
                "ERROR: wrong number of arguments: want=2, got=1",
            ),
            ("-foobar + 1", "ERROR: identifier not found: foobar"),
        ];

        test_inspect(inputs);
    }

    #[test]
    fn test_error_values() {
        let inputs = vec![
            (
                "5 + true",
                Object::error(EvaluationError::TypeMismatch {
                    left: ObjectType::Integer,
                    right: ObjectType::Boolean,
                    operation: InfixOperationKind::Plus,
                }),
            ),
            (
                "-\"a\"",
                Object::error(EvaluationError::UnknownPrefixOperator {
                    right: ObjectType::String,
                    operation: PrefixOperationKind::Minus,
                }),
            ),
            (
                "foobar",
                Object::error(EvaluationError::UnknownIdentifier("foobar".into())),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_error_stops_the_block() {
        let env = Environment::new();
        let result = run(
            "let a = 1; if (true) { let b = 2; foobar; let c = 3; }; let a = 4;",
            &env,
        );

        assert_eq!(result.to_string(), "ERROR: identifier not found: foobar");
        assert_eq!(env.get("a"), Some(Object::integer(1)));
        assert_eq!(env.get("b"), Some(Object::integer(2)));
        assert_eq!(env.get("c"), None);
    }

    #[test]
    fn test_left_operand_error_wins() {
        let env = Environment::new();
        let result = run("missing + len(1)", &env);

        assert_eq!(result.to_string(), "ERROR: identifier not found: missing");
    }

    #[test]
    fn test_first_failing_argument_aborts_the_call() {
        let env = Environment::new();
        let result = run(
            "let f = fn(a, b, c) { a }; f(1, undefined, 1 + true)",
            &env,
        );

        assert_eq!(result.to_string(), "ERROR: identifier not found: undefined");
    }

    #[test]
    fn test_let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Object::integer(5)),
            ("let a = 5 * 5; a;", Object::integer(25)),
            ("let a = 5; let b = a; b;", Object::integer(5)),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Object::integer(15),
            ),
            ("let a = 5;", Object::integer(5)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_bindings_persist_between_programs() {
        let env = Environment::new();
        run("let x = 2;", &env);
        run("let double = fn(n) { n * 2 };", &env);

        assert_eq!(run("double(x)", &env), Object::integer(4));
    }

    #[test]
    fn test_function_object() {
        test_inspect(vec![
            ("fn(x) { x + 2; };", "fn(x) { (x + 2) }"),
            ("fn() { }", "fn() { }"),
            ("len", "builtin function"),
        ]);
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            (
                "let identity = fn(x) { x }; identity(5)",
                Object::integer(5),
            ),
            (
                "let identity = fn(x) { return x }; identity(5)",
                Object::integer(5),
            ),
            (
                "let double = fn(x) { x * 2 }; double(5)",
                Object::integer(10),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5, 5)",
                Object::integer(10),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5 + 5, add(5, 5))",
                Object::integer(20),
            ),
            ("fn(x) { x }(5)", Object::integer(5)),
            ("fn() { }()", Object::null()),
            (
                "
                let factorial = fn(n) {
                    if (n < 2) { 1 }
                    else { factorial(n - 1) * n }
                };
                factorial(5)",
                Object::integer(120),
            ),
            (
                "
                let func = fn(a) {
                    fn(b) {
                        a + b
                    }
                };
                func(5)(10)",
                Object::integer(15),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_parameters_shadow_outer_bindings() {
        let env = Environment::new();
        let result = run("let x = 1; let f = fn(x) { let y = x; y }; f(2)", &env);

        assert_eq!(result, Object::integer(2));
        assert_eq!(env.get("x"), Some(Object::integer(1)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_closure() {
        let inputs = vec![
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    x
                };
                fb
            };
            let temp = fa();
            temp()"#,
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    fn() { x }
                };
                fb
            };
            let temp = fa();
            let temp_ = temp();
            temp_()"#,
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let is_even = fn(x) {
                    if (x == 0) {
                        true
                    } else {
                        is_odd(x-1)
                    }
                };
                let is_odd = fn(x) {
                    if (x == 0) {
                        false
                    } else {
                        is_even(x-1)
                    }
                };
                is_even
            };
            let temp = fa();
            temp(3);"#,
                Object::boolean(false),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_closure_uses_defining_scope() {
        let inputs = vec![
            // `x` resolves in the scope `f` was defined in, not in `g`'s.
            (
                "let x = 1; let f = fn() { x }; let g = fn(x) { f() }; g(2)",
                Object::integer(1),
            ),
            // Rebinding in the captured scope is visible to the closure.
            (
                r#"
            let counter = fn() {
                let count = 0;
                let get = fn() { count };
                let count = count + 1;
                get
            };
            counter()()"#,
                Object::integer(1),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_closures_do_not_share_state() {
        let env = Environment::new();
        run(
            r#"
            let make = fn(start) {
                let current = start;
                fn(step) { current + step }
            };
            let a = make(10);
            let b = make(100);"#,
            &env,
        );

        assert_eq!(run("a(1)", &env), Object::integer(11));
        assert_eq!(run("b(1)", &env), Object::integer(101));
        assert_eq!(run("a(2)", &env), Object::integer(12));
        assert_eq!(env.get("current"), None);
    }

    #[test]
    fn test_closure_sees_later_top_level_rebinding() {
        let env = Environment::new();
        run("let x = 1; let f = fn() { x };", &env);
        assert_eq!(run("f()", &env), Object::integer(1));

        run("let x = 2;", &env);
        assert_eq!(run("f()", &env), Object::integer(2));
    }

    #[test]
    fn test_returned_closure_scope_is_collected() {
        let before = collected_scopes();
        {
            let env = Environment::new();
            run("let f = fn() { let h = fn() { 1 }; h }; let g = f();", &env);
            assert_eq!(run("g()", &env), Object::integer(1));
        }
        gc::force_collect();

        // The global scope plus the call scopes of `f()` and `g()`.
        assert!(collected_scopes() >= before + 3);
    }

    #[test]
    fn test_string_concatenation() {
        test_evaluation(vec![
            (
                r#""Hello" + " " + "World!""#,
                Object::string("Hello World!".to_owned()),
            ),
            (r#""" + """#, Object::string(String::new())),
        ]);
    }

    #[test]
    fn test_builtin_functions() {
        let inputs = vec![
            (r#"len("")"#, "0"),
            (r#"len("four")"#, "4"),
            (r#"len("hello world")"#, "11"),
            ("len([1, 2, 3])", "3"),
            ("len(1)", "ERROR: argument to `len` not supported, got INTEGER"),
            (
                r#"len("one", "two")"#,
                "ERROR: wrong number of arguments to `len`: got=2, want=1",
            ),
            ("first([1, 2, 3])", "1"),
            ("first([])", "null"),
            ("first(1)", "ERROR: argument to `first` must be ARRAY, got INTEGER"),
            ("last([1, 2, 3])", "3"),
            ("last([])", "null"),
            ("rest([1, 2, 3])", "[2, 3]"),
            ("rest([])", "null"),
            ("push([], 1)", "[1]"),
            ("push(1, 1)", "ERROR: argument to `push` must be ARRAY, got INTEGER"),
            ("let a = [1]; let b = push(a, 2); a", "[1]"),
            ("let a = [1, 2]; rest(a); a", "[1, 2]"),
            ("puts(\"hello\", 1)", "null"),
            ("let len = fn(x) { 42 }; len([])", "42"),
        ];

        test_inspect(inputs);
    }

    #[test]
    fn test_array_literals() {
        test_evaluation(vec![(
            "[1, 2 * 2, 3 + 3]",
            Object::array(vec![
                Object::integer(1),
                Object::integer(4),
                Object::integer(6),
            ]),
        )]);
    }

    #[test]
    fn test_array_index_expressions() {
        let inputs = vec![
            ("[1, 2, 3][0]", Object::integer(1)),
            ("[1, 2, 3][1]", Object::integer(2)),
            ("[1, 2, 3][2]", Object::integer(3)),
            ("let i = 0; [1][i];", Object::integer(1)),
            ("[1, 2, 3][1 + 1];", Object::integer(3)),
            ("let myArray = [1, 2, 3]; myArray[2];", Object::integer(3)),
            (
                "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
                Object::integer(6),
            ),
            (
                "let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]",
                Object::integer(2),
            ),
            ("[1, 2, 3][3]", Object::null()),
            ("[1, 2, 3][-1]", Object::null()),
            ("let a = [1, 2]; a[len(a)]", Object::null()),
            ("[[1, 2], [3]][0][1]", Object::integer(2)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_out_of_range_index_is_the_null_singleton() {
        let result = run("[1][5]", &Environment::new());
        assert!(Gc::ptr_eq(&result, &Object::null()));
    }

    #[test]
    fn test_hash_literals() {
        let env = Environment::new();
        run(
            r#"
            let two = "two";
            let h = {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            };"#,
            &env,
        );

        let inputs = vec![
            (r#"h["one"]"#, Object::integer(1)),
            (r#"h["two"]"#, Object::integer(2)),
            (r#"h["three"]"#, Object::integer(3)),
            ("h[4]", Object::integer(4)),
            ("h[true]", Object::integer(5)),
            ("h[false]", Object::integer(6)),
            ("len([h])", Object::integer(1)),
        ];
        for (input, expected) in inputs {
            assert_eq!(run(input, &env), expected, "input: {input}");
        }

        match &*run("h", &env) {
            Object::Hash(pairs) => assert_eq!(pairs.len(), 6),
            other => panic!("expected a hash, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_index_expressions() {
        let inputs = vec![
            (r#"{"one": 1}["one"]"#, Object::integer(1)),
            (r#"{"foo": 5}["foo"]"#, Object::integer(5)),
            (r#"{"foo": 5}["bar"]"#, Object::null()),
            (r#"let key = "foo"; {"foo": 5}[key]"#, Object::integer(5)),
            (r#"{}["foo"]"#, Object::null()),
            ("{5: 5}[5]", Object::integer(5)),
            ("{true: 5}[true]", Object::integer(5)),
            ("{false: 5}[false]", Object::integer(5)),
            ("{1: 5}[true]", Object::null()),
            (r#"{"a": 1, "a": 2}["a"]"#, Object::integer(2)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_hash_key_error_skips_value() {
        let env = Environment::new();
        let result = run("{[]: undefined}", &env);

        assert_eq!(result.to_string(), "ERROR: unusable as hash key: ARRAY");
    }

    #[test]
    fn test_eval_nodes() {
        let (program, _) = parse_source("if (true) { return 7; }");
        let env = Environment::new();

        let statement = eval(Node::Statement(&program.statements[0]), &env);
        assert_eq!(statement, Object::return_value(Object::integer(7)));
        assert_eq!(statement.to_string(), "7");

        let whole = eval(Node::Program(&program), &env);
        assert_eq!(whole, Object::integer(7));

        let (program, _) = parse_source("1 + true");
        let statement = eval(Node::Statement(&program.statements[0]), &env);
        assert_eq!(
            statement.to_string(),
            "ERROR: type mismatch: INTEGER + BOOLEAN"
        );
    }

    #[test]
    fn test_inspect_is_stable() {
        let env = Environment::new();
        for input in [
            "[1, \"two\", [true, fn(x) { x }]]",
            "{\"a\": [1]}",
            "if (false) { 1 }",
            "-9223372036854775807",
        ] {
            let result = run(input, &env);
            assert_eq!(result.to_string(), result.to_string(), "input: {input}");
        }
    }
}
