use std::sync::Once;

pub mod ast;
pub mod builtin;
pub mod driver;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod stack;
pub mod token;

pub use error::{Error, Result};

use evaluator::Evaluator;
use lexer::Lexer;
use object::Object;
use parser::Parser;

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset; safe to call more than once.
pub fn init_tracing() {
  TRACING_INIT.call_once(|| {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
      tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(EnvFilter::from_default_env())
        .init();
    }
  });
}

/// Lexes, parses and evaluates `source` against the evaluator's global
/// environment. Runtime failures come back as `Ok(Object::Error(_))`.
pub fn run(source: &str, evaluator: &Evaluator) -> Result<Object> {
  let mut parser = Parser::new(Lexer::new(source));
  let program = parser.parse_program();

  if !parser.errors().is_empty() {
    return Err(Error::Parse(parser.errors().to_vec()));
  }

  Ok(evaluator.eval(&program))
}
