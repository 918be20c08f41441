use std::io::{self, BufRead, Write};

use crate::evaluator::Evaluator;
use crate::object::Object;

pub const PROMPT: &str = ">> ";

/// Reads one program per line from `reader` until end of input, writing each
/// non-null result to `writer`. Bindings persist across lines.
pub fn start<R: BufRead, W: Write>(mut reader: R, mut writer: W, evaluator: &Evaluator) -> io::Result<()> {
  let mut line = String::new();

  loop {
    write!(writer, "{PROMPT}")?;
    writer.flush()?;

    line.clear();
    if reader.read_line(&mut line)? == 0 {
      writeln!(writer)?;
      return Ok(());
    }

    if line.trim().is_empty() {
      continue;
    }

    match crate::run(&line, evaluator) {
      Ok(Object::Null) => {}
      Ok(object) => writeln!(writer, "{object}")?,
      Err(error) => writeln!(writer, "{error}")?,
    }
  }
}
