use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("failed to read '{}': {source}", path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error("{}", parse_report(.0))]
  Parse(Vec<String>),

  #[error("console i/o failed: {0}")]
  Console(#[from] io::Error),
}

fn parse_report(errors: &[String]) -> String {
  let mut report = String::from("Woops! Parser Errors!");
  for message in errors {
    report.push_str("\n\t");
    report.push_str(message);
  }
  report
}

#[cfg(test)]
mod tests {
  use std::io;

  use pretty_assertions::assert_eq;

  use super::Error;

  #[test]
  fn parse_errors_are_listed_with_tabs() {
    let error = Error::Parse(vec![
      "no prefix parse function for )".to_owned(),
      "expected next token to be =, got INT instead".to_owned(),
    ]);

    assert_eq!(
      error.to_string(),
      "Woops! Parser Errors!\n\tno prefix parse function for )\n\texpected next token to be =, got INT instead"
    );
  }

  #[test]
  fn io_errors_name_the_file() {
    let error = Error::Io {
      path: "missing.mk".into(),
      source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };

    assert_eq!(error.to_string(), "failed to read 'missing.mk': not found");
  }
}
