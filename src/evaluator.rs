use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::{BinaryOperator, BlockStatement, Expression, Program, Statement, UnaryOperator};
use crate::builtin::builtin;
use crate::env::Env;
use crate::object::{Function, HashPair, Object};
use crate::stack::ensure_sufficient_stack;

const OUTSIDE_LOOP: &str = "break/continue cannot be used outside of a loop";

/// Nesting limit for user function calls.
pub const MAX_CALL_DEPTH: usize = 20_000;

fn floor_div(left: i64, right: i64) -> Option<i64> {
  if right == 0 {
    return None;
  }

  let quotient = left.wrapping_div(right);
  if left.wrapping_rem(right) != 0 && (left < 0) != (right < 0) {
    Some(quotient - 1)
  } else {
    Some(quotient)
  }
}

/// Tree-walking evaluator.
///
/// Runtime errors and control signals (`return`, `break`, `continue`) are
/// ordinary [`Object`] values; every composite step checks its operands with
/// [`Evaluator::is_abrupt`] and hands them upward unchanged.
#[derive(Debug)]
pub struct Evaluator {
  pub env: Rc<RefCell<Env>>,
  builtins: HashMap<String, Object>,
  depth: Cell<usize>,
}

impl Evaluator {
  pub fn new(env: Rc<RefCell<Env>>) -> Self {
    Evaluator {
      env,
      builtins: builtin(),
      depth: Cell::new(0),
    }
  }

  fn error(msg: String) -> Object {
    debug!(%msg, "runtime error");
    Object::Error(msg)
  }

  /// Errors and control signals, which end the enclosing evaluation early.
  fn is_abrupt(obj: &Object) -> bool {
    matches!(
      obj,
      Object::Error(_) | Object::ReturnValue(_) | Object::Break | Object::Continue
    )
  }

  fn enclosed(env: &Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
    Env::new_with_parent(Rc::clone(env)).shared()
  }

  pub fn eval(&self, program: &Program) -> Object {
    let mut result = Object::Null;

    for statement in &program.statements {
      match self.eval_statement(statement, &self.env) {
        Some(Object::ReturnValue(value)) => return *value,
        Some(error @ Object::Error(_)) => return error,
        Some(Object::Break | Object::Continue) => return Self::error(OUTSIDE_LOOP.to_owned()),
        Some(object) => result = object,
        None => result = Object::Null,
      }
    }

    result
  }

  /// Stops at the first signal and yields it as is, so the caller can tell a
  /// `return` from a `break`.
  fn eval_block_statement(&self, block: &BlockStatement, env: &Rc<RefCell<Env>>) -> Option<Object> {
    ensure_sufficient_stack(|| {
      let mut result = None;

      for statement in &block.statements {
        result = self.eval_statement(statement, env);

        if result.as_ref().is_some_and(Self::is_abrupt) {
          return result;
        }
      }

      result
    })
  }

  /// `None` for statements that produce no value (`let`).
  fn eval_statement(&self, statement: &Statement, env: &Rc<RefCell<Env>>) -> Option<Object> {
    match statement {
      Statement::Let { name, value } => {
        let value = self.eval_expression(value, env);
        if Self::is_abrupt(&value) {
          return Some(value);
        }

        env.borrow_mut().set(name.clone(), value);
        None
      }
      Statement::Return(value) => {
        let value = self.eval_expression(value, env);
        if Self::is_abrupt(&value) {
          return Some(value);
        }

        Some(Object::ReturnValue(Box::new(value)))
      }
      Statement::Expression(expression) => Some(self.eval_expression(expression, env)),
      Statement::Break => Some(Object::Break),
      Statement::Continue => Some(Object::Continue),
    }
  }

  fn eval_expression(&self, expression: &Expression, env: &Rc<RefCell<Env>>) -> Object {
    ensure_sufficient_stack(|| self.eval_expression_inner(expression, env))
  }

  fn eval_expression_inner(&self, expression: &Expression, env: &Rc<RefCell<Env>>) -> Object {
    match expression {
      Expression::Identifier(name) => self.eval_identifier(name, env),
      Expression::Integer(value) => Object::Integer(*value),
      Expression::Boolean(value) => Object::Boolean(*value),
      Expression::String(value) => Object::String(value.clone()),
      Expression::Array(elements) => match self.eval_expressions(elements, env) {
        Ok(elements) => Object::Array(elements),
        Err(abrupt) => abrupt,
      },
      Expression::Hash(pairs) => self.eval_hash_literal(pairs, env),
      Expression::Prefix { operator, right } => {
        let right = self.eval_expression(right, env);
        if Self::is_abrupt(&right) {
          return right;
        }

        Self::eval_unary_expression(*operator, right)
      }
      Expression::Infix { left, operator, right } => {
        let left = self.eval_expression(left, env);
        if Self::is_abrupt(&left) {
          return left;
        }

        let right = self.eval_expression(right, env);
        if Self::is_abrupt(&right) {
          return right;
        }

        Self::eval_binary_expression(*operator, left, right)
      }
      Expression::Assign { name, value } => self.eval_assign_expression(name, value, env),
      Expression::If { condition, consequence, alternative } => {
        self.eval_if_expression(condition, consequence, alternative.as_ref(), env)
      }
      Expression::For { variable, iterable, body } => self.eval_for_expression(variable, iterable, body, env),
      Expression::While { condition, body } => self.eval_while_expression(condition, body, env),
      Expression::Function { parameters, body } => Object::Function(Rc::new(Function {
        parameters: parameters.clone(),
        body: Rc::clone(body),
        env: Rc::clone(env),
      })),
      Expression::Call { function, arguments } => {
        let function = self.eval_expression(function, env);
        if Self::is_abrupt(&function) {
          return function;
        }

        match self.eval_expressions(arguments, env) {
          Ok(arguments) => self.apply_function(function, arguments),
          Err(abrupt) => abrupt,
        }
      }
      Expression::Index { left, index } => {
        let left = self.eval_expression(left, env);
        if Self::is_abrupt(&left) {
          return left;
        }

        let index = self.eval_expression(index, env);
        if Self::is_abrupt(&index) {
          return index;
        }

        Self::eval_index_expression(left, index)
      }
    }
  }

  /// Left to right; the first abrupt value is returned alone.
  fn eval_expressions(&self, expressions: &[Expression], env: &Rc<RefCell<Env>>) -> Result<Vec<Object>, Object> {
    let mut objects = Vec::with_capacity(expressions.len());

    for expression in expressions {
      let object = self.eval_expression(expression, env);
      if Self::is_abrupt(&object) {
        return Err(object);
      }
      objects.push(object);
    }

    Ok(objects)
  }

  fn eval_identifier(&self, name: &str, env: &Rc<RefCell<Env>>) -> Object {
    let value = env.borrow().get(name);

    match value.or_else(|| self.builtins.get(name).cloned()) {
      Some(object) => object,
      None => Self::error(format!("identifier not found: {name}")),
    }
  }

  fn eval_unary_expression(op: UnaryOperator, right: Object) -> Object {
    match op {
      UnaryOperator::Not => Object::Boolean(!right.is_truthy()),
      UnaryOperator::Negate => match right {
        Object::Integer(value) => Object::Integer(value.wrapping_neg()),
        other => Self::error(format!("unknown operator: -{}", other.type_name())),
      },
    }
  }

  fn eval_binary_expression(op: BinaryOperator, left: Object, right: Object) -> Object {
    match (&left, &right) {
      (Object::Integer(left), Object::Integer(right)) => Self::eval_integer_binary_expression(op, *left, *right),
      (Object::Boolean(l), Object::Boolean(r)) if op == BinaryOperator::Equal => Object::Boolean(l == r),
      (Object::Boolean(l), Object::Boolean(r)) if op == BinaryOperator::NotEqual => Object::Boolean(l != r),
      (Object::String(l), Object::String(r)) if op == BinaryOperator::Add => Object::String(format!("{l}{r}")),
      _ if left.type_name() == right.type_name() => Self::error(format!(
        "unknown operator: {} {} {}",
        left.type_name(),
        op,
        right.type_name()
      )),
      _ => Self::error(format!(
        "type mismatch: {} {} {}",
        left.type_name(),
        op,
        right.type_name()
      )),
    }
  }

  fn eval_integer_binary_expression(op: BinaryOperator, left: i64, right: i64) -> Object {
    match op {
      BinaryOperator::Add => Object::Integer(left.wrapping_add(right)),
      BinaryOperator::Subtract => Object::Integer(left.wrapping_sub(right)),
      BinaryOperator::Multiply => Object::Integer(left.wrapping_mul(right)),
      BinaryOperator::Divide => match floor_div(left, right) {
        Some(value) => Object::Integer(value),
        None => Self::error("division by zero".to_owned()),
      },
      BinaryOperator::Equal => Object::Boolean(left == right),
      BinaryOperator::NotEqual => Object::Boolean(left != right),
      BinaryOperator::Less => Object::Boolean(left < right),
      BinaryOperator::Greater => Object::Boolean(left > right),
    }
  }

  fn eval_assign_expression(&self, name: &str, value: &Expression, env: &Rc<RefCell<Env>>) -> Object {
    let value = self.eval_expression(value, env);
    if Self::is_abrupt(&value) {
      return value;
    }

    if env.borrow_mut().reset(name, value.clone()) {
      value
    } else {
      Self::error(format!("variable '{name}' does not exist. Can't reassign"))
    }
  }

  fn eval_if_expression(
    &self,
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Rc<RefCell<Env>>,
  ) -> Object {
    let condition = self.eval_expression(condition, env);
    if Self::is_abrupt(&condition) {
      return condition;
    }

    let branch = if condition.is_truthy() {
      Some(consequence)
    } else {
      alternative
    };

    branch
      .and_then(|block| self.eval_block_statement(block, env))
      .unwrap_or(Object::Null)
  }

  /// Folds one loop-body outcome into the running loop value.
  fn loop_step(outcome: Option<Object>, result: &mut Object) -> ControlFlow<Object> {
    match outcome {
      Some(Object::Break) => ControlFlow::Break(Object::Null),
      Some(Object::Continue) | None => ControlFlow::Continue(()),
      Some(signal @ (Object::ReturnValue(_) | Object::Error(_))) => ControlFlow::Break(signal),
      Some(value) => {
        *result = value;
        ControlFlow::Continue(())
      }
    }
  }

  fn eval_for_expression(
    &self,
    variable: &str,
    iterable: &Expression,
    body: &BlockStatement,
    env: &Rc<RefCell<Env>>,
  ) -> Object {
    let iterable = self.eval_expression(iterable, env);
    if Self::is_abrupt(&iterable) {
      return iterable;
    }

    let elements = match iterable {
      Object::Array(elements) => elements,
      other => return Self::error(format!("iterator must be ARRAY. found {}", other.type_name())),
    };

    let mut result = Object::Null;

    for (iteration, element) in elements.into_iter().enumerate() {
      trace!(iteration, variable, "for");

      let scope = Self::enclosed(env);
      scope.borrow_mut().set(variable, element);

      if let ControlFlow::Break(value) = Self::loop_step(self.eval_block_statement(body, &scope), &mut result) {
        return value;
      }
    }

    result
  }

  fn eval_while_expression(&self, condition: &Expression, body: &BlockStatement, env: &Rc<RefCell<Env>>) -> Object {
    let mut result = Object::Null;

    loop {
      let test = self.eval_expression(condition, env);
      if Self::is_abrupt(&test) {
        return test;
      }
      if !test.is_truthy() {
        return result;
      }

      let scope = Self::enclosed(env);

      if let ControlFlow::Break(value) = Self::loop_step(self.eval_block_statement(body, &scope), &mut result) {
        return value;
      }
    }
  }

  #[tracing::instrument(level = "trace", skip_all, fields(callee = function.type_name(), arguments = arguments.len()))]
  fn apply_function(&self, function: Object, arguments: Vec<Object>) -> Object {
    match function {
      Object::Function(function) => {
        if arguments.len() < function.parameters.len() {
          let missing = function.parameters[arguments.len()..].join(", ");
          return Self::error(format!("function call missing required arguments: {missing}"));
        }

        let depth = self.depth.get();
        if depth >= MAX_CALL_DEPTH {
          return Self::error(format!("maximum recursion depth exceeded ({MAX_CALL_DEPTH})"));
        }

        let scope = Self::enclosed(&function.env);
        {
          let mut scope = scope.borrow_mut();
          for (parameter, argument) in function.parameters.iter().zip(arguments) {
            scope.set(parameter.as_str(), argument);
          }
        }

        self.depth.set(depth + 1);
        let outcome = self.eval_block_statement(&function.body, &scope);
        self.depth.set(depth);

        match outcome {
          Some(Object::ReturnValue(value)) => *value,
          Some(Object::Break | Object::Continue) => Self::error(OUTSIDE_LOOP.to_owned()),
          Some(value) => value,
          None => Object::Null,
        }
      }
      Object::Builtin(name, builtin) => {
        trace!(name, "builtin");
        builtin(arguments)
      }
      other => Self::error(format!("not a function: {}", other.type_name())),
    }
  }

  fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
      (Object::Array(elements), Object::Integer(position)) => usize::try_from(*position)
        .ok()
        .and_then(|position| elements.get(position))
        .cloned()
        .unwrap_or(Object::Null),
      (Object::Hash(pairs), _) => match index.hash_key() {
        Some(key) => pairs.get(&key).map_or(Object::Null, |pair| pair.value.clone()),
        None => Self::error(format!("unusable as hash key: {}", index.type_name())),
      },
      _ => Self::error(format!("index operator not supported: {}", left.type_name())),
    }
  }

  fn eval_hash_literal(&self, pairs: &[(Expression, Expression)], env: &Rc<RefCell<Env>>) -> Object {
    let mut hash = BTreeMap::new();

    for (key, value) in pairs {
      let key = self.eval_expression(key, env);
      if Self::is_abrupt(&key) {
        return key;
      }

      let Some(hash_key) = key.hash_key() else {
        return Self::error(format!("unusable as hash key: {}", key.type_name()));
      };

      let value = self.eval_expression(value, env);
      if Self::is_abrupt(&value) {
        return value;
      }

      hash.insert(hash_key, HashPair { key, value });
    }

    Object::Hash(hash)
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use pretty_assertions::assert_eq;

  use super::{floor_div, Evaluator, MAX_CALL_DEPTH};
  use crate::env::Env;
  use crate::lexer::Lexer;
  use crate::object::{HashKey, Object};
  use crate::parser::Parser;

  fn eval(input: &str) -> Object {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "parser errors for {input:?}: {:?}", parser.errors());

    Evaluator::new(Env::new().shared()).eval(&program)
  }

  fn assert_integer(input: &str, expected: i64) {
    assert_eq!(eval(input), Object::Integer(expected), "input: {input}");
  }

  fn assert_boolean(input: &str, expected: bool) {
    assert_eq!(eval(input), Object::Boolean(expected), "input: {input}");
  }

  fn assert_null(input: &str) {
    assert_eq!(eval(input), Object::Null, "input: {input}");
  }

  fn assert_error(input: &str, expected: &str) {
    assert_eq!(eval(input), Object::Error(expected.to_owned()), "input: {input}");
  }

  #[test]
  fn integer_expressions() {
    let tests = [
      ("5", 5),
      ("10", 10),
      ("-5", -5),
      ("-10", -10),
      ("5 + 5 + 2", 12),
      ("2 * 2 * 2", 8),
      ("-50 + 100 + -50", 0),
      ("5 + 2 * 10", 25),
      ("50 / 2 * 2 + 10", 60),
      ("(5+10*2+15/3)*2+-10", 50),
      ("7 / 2", 3),
      ("-7 / 2", -4),
      ("7 / -2", -4),
      ("-8 / 2", -4),
      ("let a = 2; a = 3;", 3),
      ("let a = 5; 5+10*(a=2);", 25),
      ("let a = 3; let f = fn(){a=1;}; f(); a;", 1),
    ];

    for (input, expected) in tests {
      assert_integer(input, expected);
    }
  }

  #[test]
  fn floor_division() {
    assert_eq!(floor_div(7, 2), Some(3));
    assert_eq!(floor_div(-7, 2), Some(-4));
    assert_eq!(floor_div(-7, -2), Some(3));
    assert_eq!(floor_div(6, -3), Some(-2));
    assert_eq!(floor_div(i64::MIN, -1), Some(i64::MIN));
    assert_eq!(floor_div(1, 0), None);
  }

  #[test]
  fn boolean_expressions() {
    let tests = [
      ("true", true),
      ("false", false),
      ("1 < 2", true),
      ("1 > 2", false),
      ("1 == 1", true),
      ("1 != 1", false),
      ("1 > 1", false),
      ("2 != 1", true),
      ("1 < 1", false),
      ("true == true", true),
      ("true != false", true),
      ("false == false", true),
      ("false != true", true),
      ("true == false", false),
      ("true != true", false),
      ("false != false", false),
      ("(1<2) == true", true),
      ("false == (2>1)", false),
    ];

    for (input, expected) in tests {
      assert_boolean(input, expected);
    }
  }

  #[test]
  fn bang_operator() {
    let tests = [
      ("!true", false),
      ("!false", true),
      ("!5", false),
      ("!0", false),
      ("!!true", true),
      ("!!false", false),
      ("!!5", true),
    ];

    for (input, expected) in tests {
      assert_boolean(input, expected);
    }
  }

  #[test]
  fn if_else_expressions() {
    assert_integer("if(true){10}", 10);
    assert_null("if(false){10}");
    assert_integer("if(1){10}", 10);
    assert_integer("if(1<2){10}", 10);
    assert_null("if(1>2){10}");
    assert_integer("if(1>2){10}else{2}", 2);
    assert_integer("if(1<2){1}else{2}", 1);
    assert_null("if(true){}");
  }

  #[test]
  fn for_expressions() {
    assert_null("for(x in []){1}");
    assert_integer("for(x in [1,2,3]){x;}", 3);
    assert_integer("let sum = 0; for(x in [1,2,3]){sum = sum + x;}; sum", 6);
    assert_null("for(x in [1,2,3]){if(x == 2){break;} x}");
    assert_integer("let sum = 0; for(x in [1,2,3]){if(x == 2){continue;} sum = sum + x;}; sum", 4);
    assert_integer("for(x in [1,2,3]){if(x == 3){continue;} x}", 2);
    assert_error("for(x in 5){x}", "iterator must be ARRAY. found INTEGER");
  }

  #[test]
  fn loop_variable_is_scoped_to_the_body() {
    assert_error("for(x in [1]){x}; x", "identifier not found: x");
    assert_integer("let x = 10; for(x in [1, 2]){x}; x", 10);
  }

  #[test]
  fn while_expressions() {
    assert_integer("let i = 2; while(i>0){i = i-1; i;}", 0);
    assert_null("while(false){2;}");
    assert_integer(
      "let i = 0; let hits = 0; while(true){ i = i + 1; if(i > 5){break;} if(i == 2){continue;} hits = hits + 1; }; hits",
      4,
    );
    assert_error("while(1 + true){1}", "type mismatch: INTEGER + BOOLEAN");
  }

  #[test]
  fn let_inside_loop_body_is_fresh_each_pass() {
    assert_integer(
      "let total = 0; for(x in [1, 2, 3]){ let doubled = x * 2; total = total + doubled; }; total",
      12,
    );
    assert_error("let i = 1; while(i > 0){ let inner = 1; i = i - 1; }; inner", "identifier not found: inner");
  }

  #[test]
  fn return_statements() {
    let tests = [
      ("return 10;", 10),
      ("return 10; 9;", 10),
      ("return 2*5; 9;", 10),
      ("9; return 2*5; 9;", 10),
      ("if (true){ if(true){ return 1; } return 2; }", 1),
      ("let f = fn(){ for(x in [1, 2, 3]){ if(x == 2){ return x * 10; } } 0 }; f()", 20),
      ("let f = fn(){ while(true){ return 7; } }; f()", 7),
    ];

    for (input, expected) in tests {
      assert_integer(input, expected);
    }
  }

  #[test]
  fn signals_outside_loops() {
    assert_error("break;", "break/continue cannot be used outside of a loop");
    assert_error("1; continue; 2", "break/continue cannot be used outside of a loop");
    assert_error("if(true){break;}", "break/continue cannot be used outside of a loop");
    assert_error(
      "for(x in [1]){ fn(){ break; }() }",
      "break/continue cannot be used outside of a loop",
    );
  }

  #[test]
  fn error_handling() {
    let tests = [
      ("5 + true", "type mismatch: INTEGER + BOOLEAN"),
      ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
      ("-true", "unknown operator: -BOOLEAN"),
      ("true + false", "unknown operator: BOOLEAN + BOOLEAN"),
      ("5; true + false; 5;", "unknown operator: BOOLEAN + BOOLEAN"),
      ("if(10>1){true+false;}", "unknown operator: BOOLEAN + BOOLEAN"),
      ("if(10>1){ if(10>1){ return true + false; } return 1; }", "unknown operator: BOOLEAN + BOOLEAN"),
      ("foobar", "identifier not found: foobar"),
      ("\"hello\" - \"world\"", "unknown operator: STRING - STRING"),
      ("\"a\" == \"a\"", "unknown operator: STRING == STRING"),
      ("fn(x,y){}()", "function call missing required arguments: x, y"),
      ("fn(x,y,z){}(2)", "function call missing required arguments: y, z"),
      ("{\"name\": \"monkey\"}[fn(x){x}];", "unusable as hash key: FUNCTION"),
      ("{[1]: 2}", "unusable as hash key: ARRAY"),
      ("a = 3;", "variable 'a' does not exist. Can't reassign"),
      ("8 * (x=2);", "variable 'x' does not exist. Can't reassign"),
      ("1 / 0", "division by zero"),
      ("5(1)", "not a function: INTEGER"),
      ("5[0]", "index operator not supported: INTEGER"),
      ("[1][\"a\"]", "index operator not supported: ARRAY"),
      ("[1, foo, bar]", "identifier not found: foo"),
    ];

    for (input, expected) in tests {
      assert_error(input, expected);
    }
  }

  #[test]
  fn argument_errors_stop_evaluation() {
    assert_error(
      "let n = 0; let bump = fn(){ n = n + 1; }; fn(a, b){}(missing, bump()); n",
      "identifier not found: missing",
    );
    assert_integer("let n = 0; let bump = fn(){ n = n + 1; }; fn(a, b){ a }(bump(), bump()); n", 2);
  }

  #[test]
  fn extra_arguments_are_ignored() {
    assert_integer("fn(x){ x }(1, 2, 3)", 1);
  }

  #[test]
  fn let_statements() {
    assert_integer("let a = 5; a;", 5);
    assert_integer("let a = 5*5; a;", 25);
    assert_integer("let a = 5; let b = a; b;", 5);
    assert_integer("let a=5; let b=a; let c=a + b + 5; c;", 15);
    assert_null("let a = 5;");
    assert_null("5; let a = 5;");
  }

  #[test]
  fn function_object() {
    match eval("fn(x){x+2;};") {
      Object::Function(function) => {
        assert_eq!(function.parameters, vec!["x".to_owned()]);
        assert_eq!(function.body.to_string(), "{(x+2)}");
      }
      other => panic!("object is not Function. got {other:?}"),
    }

    assert_eq!(eval("fn(x, y){x+y;};").to_string(), "fn(x, y){(x+y)}");
  }

  #[test]
  fn function_application() {
    assert_integer("let identity = fn(x){x;}; identity(5);", 5);
    assert_integer("let identity = fn(x){return x;}; identity(5);", 5);
    assert_integer("let double = fn(x){x*2;}; double(5);", 10);
    assert_integer("let add = fn(x, y){x + y}; add(5, 2);", 7);
    assert_integer("let add = fn(x, y){x + y}; add(5 + 5, add(5, 5));", 20);
    assert_integer("fn(x){x;}(5)", 5);
    assert_null("fn(){}();");
    assert_null("fn(){ let a = 1; }();");
  }

  #[test]
  fn closures() {
    assert_integer(
      "let new_adder = fn(x) { fn(y){x + y}; }; let add_two = new_adder(2); add_two(2);",
      4,
    );
  }

  #[test]
  fn closures_share_their_environment() {
    assert_integer("let x = 1; let get = fn(){ x }; x = 5; get()", 5);
    assert_integer(
      "let counter = fn(){ let n = 0; fn(){ n = n + 1; n } }; let next = counter(); next(); next(); next()",
      3,
    );
    assert_integer(
      "let make = fn(){ let n = 0; [fn(){ n = n + 1; }, fn(){ n }] }; let pair = make(); pair[0](); pair[0](); pair[1]()",
      2,
    );
  }

  #[test]
  fn calls_use_the_defining_environment() {
    assert_error(
      "let f = fn(){ secret }; let g = fn(){ let secret = 1; f() }; g()",
      "identifier not found: secret",
    );
  }

  #[test]
  fn recursion() {
    assert_integer(
      "let fib = fn(n){ if(n < 2){ return n; } fib(n - 1) + fib(n - 2) }; fib(15)",
      610,
    );
  }

  #[test]
  fn deep_recursion_terminates() {
    assert_integer(
      "let f = fn(n){ if (n == 0) { 0 } else { 1 + f(n - 1) } }; f(10000)",
      10000,
    );
  }

  #[test]
  fn runaway_recursion_is_an_error() {
    assert_error(
      "let f = fn(){ f() }; f()",
      &format!("maximum recursion depth exceeded ({MAX_CALL_DEPTH})"),
    );
  }

  #[test]
  fn call_depth_resets_after_an_error() {
    let evaluator = Evaluator::new(Env::new().shared());
    let run = |input: &str| {
      let mut parser = Parser::new(Lexer::new(input));
      evaluator.eval(&parser.parse_program())
    };

    run("let down = fn(n){ if (n == 0) { 0 } else { down(n - 1) } };");
    assert!(matches!(run("let f = fn(){ f() }; f()"), Object::Error(_)));
    assert_eq!(run("down(100)"), Object::Integer(0));
  }

  #[test]
  fn function_literals_share_their_body() {
    match eval("let make = fn(){ fn(x){ x } }; [make(), make()]") {
      Object::Array(elements) => match elements.as_slice() {
        [Object::Function(first), Object::Function(second)] => {
          assert!(!Rc::ptr_eq(first, second));
          assert!(Rc::ptr_eq(&first.body, &second.body));
        }
        other => panic!("expected two functions, got {other:?}"),
      },
      other => panic!("expected an array, got {other:?}"),
    }
  }

  #[test]
  fn strings() {
    assert_eq!(eval("\"Hello World!\""), Object::String("Hello World!".to_owned()));
    assert_eq!(eval("\"Hello \" + \"World!\""), Object::String("Hello World!".to_owned()));
  }

  #[test]
  fn builtin_functions() {
    assert_integer("len(\"\")", 0);
    assert_integer("len(\"four\")", 4);
    assert_integer("len(\"hello world\")", 11);
    assert_error("len(1)", "argument to 'len' not supported, got INTEGER");
    assert_error("len(\"one\", \"two\")", "wrong number of arguments. got 2, want 1");
    assert_integer("len([1, 2, 3])", 3);
    assert_integer("let a = [1, 2]; len(a);", 2);
    assert_integer("first([1,2])", 1);
    assert_integer("last([1,2,3])", 3);
    assert_eq!(eval("rest([1, 2, 3])").to_string(), "[2, 3]");
    assert_eq!(eval("push([1,2], 3)").to_string(), "[1, 2, 3]");
    assert_eq!(eval("let a = [1]; push(a, 2); a").to_string(), "[1]");
    assert_eq!(eval("range(5)").to_string(), "[0, 1, 2, 3, 4]");
    assert_eq!(eval("range(0)").to_string(), "[]");
    assert_eq!(eval("range(-1)").to_string(), "[]");
    assert_eq!(eval("to_str(12) + \"!\""), Object::String("12!".to_owned()));
    assert_null("puts(\"hi\")");
    assert_eq!(eval("len").to_string(), "builtin function len");
  }

  #[test]
  fn builtins_can_be_shadowed_but_not_reassigned() {
    assert_integer("let len = fn(x){ 99 }; len([1])", 99);
    assert_error("len = 5", "variable 'len' does not exist. Can't reassign");
  }

  #[test]
  fn array_literal() {
    assert_eq!(
      eval("[1, 2*2, 3+3]"),
      Object::Array(vec![Object::Integer(1), Object::Integer(4), Object::Integer(6)])
    );
  }

  #[test]
  fn array_index_expressions() {
    assert_integer("[1, 2, 3][0]", 1);
    assert_integer("[1, 2, 3][1]", 2);
    assert_integer("[1, 3, 8][2]", 8);
    assert_integer("let i = 0; [1][i]", 1);
    assert_integer("[1, 2, 3][1+1]", 3);
    assert_integer("let my_array = [1, 2, 3]; my_array[2]", 3);
    assert_null("[1, 2, 3][3]");
    assert_null("[1, 2, 3][-1]");
  }

  #[test]
  fn hash_literals() {
    let input = r#"
    let two = "two";
    {
        "one": 10 - 9,
        two: 1 + 1,
        "thr" + "ee": 6/2,
        4: 4,
        true: 5,
        false: 6
    }
    "#;

    let expected = [
      (HashKey::String("one".to_owned()), 1),
      (HashKey::String("two".to_owned()), 2),
      (HashKey::String("three".to_owned()), 3),
      (HashKey::Integer(4), 4),
      (HashKey::Boolean(true), 5),
      (HashKey::Boolean(false), 6),
    ];

    match eval(input) {
      Object::Hash(pairs) => {
        assert_eq!(pairs.len(), expected.len());
        for (key, value) in expected {
          let pair = pairs.get(&key).unwrap_or_else(|| panic!("no pair for key {key:?}"));
          assert_eq!(pair.value, Object::Integer(value));
        }
      }
      other => panic!("object is not Hash, got {other:?}"),
    }
  }

  #[test]
  fn duplicate_hash_keys_keep_the_last_value() {
    assert_integer("{\"a\": 1, \"a\": 2}[\"a\"]", 2);
    assert_eq!(eval("{\"a\": 1, \"a\": 2}").to_string(), "{\"a\": 2}");
  }

  #[test]
  fn hash_index_expressions() {
    assert_integer(r#"{"foo": 5}["foo"]"#, 5);
    assert_null(r#"{"foo": 5}["bar"]"#);
    assert_integer(r#"let key = "foo"; {"foo": 5}[key]"#, 5);
    assert_null(r#"{}["foo"]"#);
    assert_integer("{5: 5}[5]", 5);
    assert_integer("{true: 6}[true]", 6);
    assert_integer("{false: 2}[false]", 2);
  }
}
