use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

use crate::ast::BlockStatement;
use crate::env::Env;

pub type BuiltinFn = fn(Vec<Object>) -> Object;

/// Content-derived key of a hashable value.
///
/// Ordering puts integers before booleans before strings, which is the order
/// hash entries are displayed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashKey {
  Integer(i64),
  Boolean(bool),
  String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
  pub key: Object,
  pub value: Object,
}

/// A closure: parameters, body, and the environment it was defined in.
pub struct Function {
  pub parameters: Vec<String>,
  pub body: Rc<BlockStatement>,
  pub env: Rc<RefCell<Env>>,
}

impl fmt::Debug for Function {
  // The captured environment may contain this very function.
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Function")
      .field("parameters", &self.parameters)
      .field("body", &self.body)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone)]
pub enum Object {
  Null,
  Integer(i64),
  Boolean(bool),
  String(String),
  Array(Vec<Object>),
  Hash(BTreeMap<HashKey, HashPair>),
  Function(Rc<Function>),
  Builtin(&'static str, BuiltinFn),
  ReturnValue(Box<Object>),
  Break,
  Continue,
  Error(String),
}

impl Object {
  pub fn type_name(&self) -> &'static str {
    match self {
      Object::Null => "NULL",
      Object::Integer(_) => "INTEGER",
      Object::Boolean(_) => "BOOLEAN",
      Object::String(_) => "STRING",
      Object::Array(_) => "ARRAY",
      Object::Hash(_) => "HASH",
      Object::Function(_) => "FUNCTION",
      Object::Builtin(..) => "BUILTIN",
      Object::ReturnValue(_) => "RETURN_VALUE",
      Object::Break => "BREAK",
      Object::Continue => "CONTINUE",
      Object::Error(_) => "ERROR",
    }
  }

  /// `None` for values that cannot be used as hash keys.
  pub fn hash_key(&self) -> Option<HashKey> {
    match self {
      Object::Integer(value) => Some(HashKey::Integer(*value)),
      Object::Boolean(value) => Some(HashKey::Boolean(*value)),
      Object::String(value) => Some(HashKey::String(value.clone())),
      _ => None,
    }
  }

  pub fn is_truthy(&self) -> bool {
    !matches!(self, Object::Null | Object::Boolean(false))
  }

  /// Display text for a value nested inside an array or hash: strings are quoted.
  pub fn inspect(&self) -> String {
    match self {
      Object::String(value) => format!("\"{value}\""),
      other => other.to_string(),
    }
  }
}

impl PartialEq for Object {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Object::Null, Object::Null) | (Object::Break, Object::Break) | (Object::Continue, Object::Continue) => true,
      (Object::Integer(left), Object::Integer(right)) => left == right,
      (Object::Boolean(left), Object::Boolean(right)) => left == right,
      (Object::String(left), Object::String(right)) | (Object::Error(left), Object::Error(right)) => left == right,
      (Object::Array(left), Object::Array(right)) => left == right,
      (Object::Hash(left), Object::Hash(right)) => left == right,
      (Object::Function(left), Object::Function(right)) => Rc::ptr_eq(left, right),
      (Object::Builtin(left, _), Object::Builtin(right, _)) => left == right,
      (Object::ReturnValue(left), Object::ReturnValue(right)) => left == right,
      _ => false,
    }
  }
}

impl fmt::Display for Object {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Object::Null => f.write_str("null"),
      Object::Integer(value) => write!(f, "{value}"),
      Object::Boolean(value) => write!(f, "{value}"),
      Object::String(value) => f.write_str(value),
      Object::Array(elements) => {
        let elements = elements.iter().map(Object::inspect).collect::<Vec<_>>();
        write!(f, "[{}]", elements.join(", "))
      }
      Object::Hash(pairs) => {
        let pairs = pairs
          .values()
          .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
          .collect::<Vec<_>>();
        write!(f, "{{{}}}", pairs.join(", "))
      }
      Object::Function(function) => write!(f, "fn({}){}", function.parameters.join(", "), function.body),
      Object::Builtin(name, _) => write!(f, "builtin function {name}"),
      Object::ReturnValue(value) => write!(f, "{value}"),
      Object::Break => f.write_str("break"),
      Object::Continue => f.write_str("continue"),
      Object::Error(message) => write!(f, "ERROR: {message}"),
    }
  }
}
