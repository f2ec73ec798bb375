//! Decodes Anchor program errors out of transaction logs.

use std::sync::LazyLock;

use regex::Regex;

static ERROR_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"Error Number: (\d+)").expect("error number pattern")
});
static ERROR_CODE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"Error Code: (\w+)").expect("error code pattern")
});
static ERROR_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"Error Message: ([^.]*)\.").expect("error message pattern")
});

/// Error reported by a program through an `AnchorError` log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLogError {
  pub number: u32,
  pub code: String,
  pub message: String,
}

fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
  pattern.captures(line)?.get(1).map(|m| m.as_str())
}

impl ProgramLogError {
  /// First `AnchorError` in `logs`, `None` if absent or malformed.
  #[must_use]
  pub fn from_logs<S: AsRef<str>>(logs: &[S]) -> Option<ProgramLogError> {
    let line = logs
      .iter()
      .map(AsRef::as_ref)
      .find(|line| line.contains("AnchorError"))?;
    let number = capture(&ERROR_NUMBER, line)?.parse().ok()?;
    let code = capture(&ERROR_CODE, line)?.to_string();
    let message = capture(&ERROR_MESSAGE, line)?.to_string();
    Some(ProgramLogError {
      number,
      code,
      message,
    })
  }
}

impl std::fmt::Display for ProgramLogError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({}): {}", self.code, self.number, self.message)
  }
}

impl std::error::Error for ProgramLogError {}
