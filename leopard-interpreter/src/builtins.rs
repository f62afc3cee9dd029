use std::io::Write;
use gc::Gc;

use crate::object::{BuiltinFunction, EvaluationError, Object, ObjectType};

fn check_argument_count(
    function: &'static str,
    expected: usize,
    args: &[Gc<Object>],
) -> Result<(), EvaluationError> {
    if args.len() != expected {
        return Err(EvaluationError::BuiltinArgumentCount {
            function,
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

/// The single argument of `function`, which must be an array.
fn array_argument<'a>(
    function: &'static str,
    args: &'a [Gc<Object>],
) -> Result<&'a [Gc<Object>], EvaluationError> {
    check_argument_count(function, 1, args)?;
    match &*args[0] {
        Object::Array(arr) => Ok(arr),
        other => Err(EvaluationError::BuiltinArgumentType {
            function,
            expected: ObjectType::Array,
            actual: other.object_type(),
        }),
    }
}

fn builtin_len(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("len", 1, &args)?;
    match &*args[0] {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(EvaluationError::BuiltinUnsupportedArgument {
            function: "len",
            actual: other.object_type(),
        }),
    }
}

fn builtin_first(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    let arr = array_argument("first", &args)?;
    Ok(arr.first().cloned().unwrap_or_else(Object::null))
}

fn builtin_last(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    let arr = array_argument("last", &args)?;
    Ok(arr.last().cloned().unwrap_or_else(Object::null))
}

fn builtin_rest(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    let arr = array_argument("rest", &args)?;
    if arr.is_empty() {
        return Ok(Object::null());
    }
    Ok(Object::array(arr[1..].to_vec()))
}

fn builtin_push(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("push", 2, &args)?;
    match &*args[0] {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(EvaluationError::BuiltinArgumentType {
            function: "push",
            expected: ObjectType::Array,
            actual: other.object_type(),
        }),
    }
}

fn builtin_puts(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    let mut stdout = std::io::stdout().lock();
    for arg in &args {
        if let Err(err) = writeln!(stdout, "{}", arg) {
            log::warn!("puts failed to write: {err}");
        }
    }
    Ok(Object::null())
}

pub fn lookup_builtin(name: &str) -> Option<BuiltinFunction> {
    let builtin = match name {
        "len" => BuiltinFunction {
            name: "len",
            func: builtin_len,
        },
        "first" => BuiltinFunction {
            name: "first",
            func: builtin_first,
        },
        "last" => BuiltinFunction {
            name: "last",
            func: builtin_last,
        },
        "rest" => BuiltinFunction {
            name: "rest",
            func: builtin_rest,
        },
        "push" => BuiltinFunction {
            name: "push",
            func: builtin_push,
        },
        "puts" => BuiltinFunction {
            name: "puts",
            func: builtin_puts,
        },
        _ => return None,
    };
    Some(builtin)
}
