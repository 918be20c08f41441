use std::io::{self, Write};

use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;
use crate::Error;

/// What to do once a script has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Done,
  Interactive,
}

/// Runs a whole script against `evaluator`.
///
/// The final value is written unless it is null or `interactive` is set;
/// runtime errors are written in either case. A parse error writes the
/// parser report and always ends with [`Outcome::Done`].
pub fn run_script<W: Write>(source: &str, mut writer: W, evaluator: &Evaluator, interactive: bool) -> io::Result<Outcome> {
  match crate::run(source, evaluator) {
    Ok(Object::Null) => {}
    Ok(error @ Object::Error(_)) => writeln!(writer, "{error}")?,
    Ok(object) if !interactive => writeln!(writer, "{object}")?,
    Ok(_) => {}
    Err(error) => {
      writeln!(writer, "{error}")?;
      return Ok(Outcome::Done);
    }
  }

  Ok(if interactive { Outcome::Interactive } else { Outcome::Done })
}

pub fn print_tokens<W: Write>(source: &str, mut writer: W) -> io::Result<()> {
  for token in Lexer::new(source) {
    writeln!(writer, "{token}")?;
  }
  Ok(())
}

pub fn print_ast<W: Write>(source: &str, mut writer: W) -> io::Result<()> {
  let mut parser = Parser::new(Lexer::new(source));
  let program = parser.parse_program();

  if parser.errors().is_empty() {
    writeln!(writer, "{program}")
  } else {
    writeln!(writer, "{}", Error::Parse(parser.errors().to_vec()))
  }
}
