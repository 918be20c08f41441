use std::collections::HashMap;

use rand::Rng;
use tracing::trace;

use crate::object::{BuiltinFn, Object};

pub fn builtin() -> HashMap<String, Object> {
  let entries: [(&'static str, BuiltinFn); 9] = [
    ("len", builtin_len),
    ("first", builtin_first),
    ("last", builtin_last),
    ("rest", builtin_rest),
    ("push", builtin_push),
    ("puts", builtin_puts),
    ("to_str", builtin_to_str),
    ("range", builtin_range),
    ("randint", builtin_randint),
  ];

  entries
    .into_iter()
    .map(|(name, function)| (name.to_owned(), Object::Builtin(name, function)))
    .collect()
}

fn wrong_arguments(args: &[Object], want: usize) -> Object {
  Object::Error(format!("wrong number of arguments. got {}, want {}", args.len(), want))
}

fn not_an_array(name: &str, arg: &Object) -> Object {
  Object::Error(format!("argument to '{}' must be ARRAY, got {}", name, arg.type_name()))
}

fn builtin_len(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::String(value)] => Object::Integer(value.chars().count() as i64),
    [Object::Array(elements)] => Object::Integer(elements.len() as i64),
    [other] => Object::Error(format!("argument to 'len' not supported, got {}", other.type_name())),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_first(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Array(elements)] => elements.first().cloned().unwrap_or(Object::Null),
    [other] => not_an_array("first", other),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_last(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Array(elements)] => elements.last().cloned().unwrap_or(Object::Null),
    [other] => not_an_array("last", other),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_rest(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Array(elements)] if elements.is_empty() => Object::Null,
    [Object::Array(elements)] => Object::Array(elements[1..].to_vec()),
    [other] => not_an_array("rest", other),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_push(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Array(elements), value] => {
      let mut elements = elements.clone();
      elements.push(value.clone());
      Object::Array(elements)
    }
    [other, _] => not_an_array("push", other),
    _ => wrong_arguments(&args, 2),
  }
}

fn builtin_puts(args: Vec<Object>) -> Object {
  trace!(count = args.len(), "puts");

  for arg in &args {
    println!("{arg}");
  }

  Object::Null
}

fn builtin_to_str(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [value @ (Object::Integer(_) | Object::Boolean(_) | Object::String(_))] => Object::String(value.to_string()),
    [other] => Object::Error(format!("argument to 'to_str' not supported, got {}", other.type_name())),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_range(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Integer(end)] => Object::Array((0..*end).map(Object::Integer).collect()),
    [other] => Object::Error(format!("argument to 'range' must be INTEGER, got {}", other.type_name())),
    _ => wrong_arguments(&args, 1),
  }
}

fn builtin_randint(args: Vec<Object>) -> Object {
  match args.as_slice() {
    [Object::Integer(upper)] if *upper < 0 => {
      Object::Error(format!("argument to 'randint' must be non-negative, got {upper}"))
    }
    [Object::Integer(upper)] => Object::Integer(rand::thread_rng().gen_range(0..=*upper)),
    [other] => Object::Error(format!("argument to 'randint' must be INTEGER, got {}", other.type_name())),
    _ => wrong_arguments(&args, 1),
  }
}
