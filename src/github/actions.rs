//! Reporting to the Actions runner: workflow commands on stdout and step
//! outputs in the `GITHUB_OUTPUT` file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

fn escape_data(value: &str) -> String {
  value
    .replace('%', "%25")
    .replace('\r', "%0D")
    .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
  escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

pub fn error_command(message: &str) -> String {
  format!("::error::{}", escape_data(message))
}

/// Emits an error annotation. Does not stop the run.
pub fn error(message: &str) {
  println!("{}", error_command(message));
}

/// Marks the run failed with `message`; the caller is responsible for exiting
/// with a non-zero code.
pub fn set_failed(message: &str) {
  error(message);
}

/// `name=value`, or heredoc form with a random delimiter for multi-line values.
fn output_entry(name: &str, value: &str) -> String {
  if value.contains('\n') || value.contains('\r') {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
  } else {
    format!("{name}={value}\n")
  }
}

fn set_output_command(name: &str, value: &str) -> String {
  format!(
    "::set-output name={}::{}",
    escape_property(name),
    escape_data(value)
  )
}

pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
  let mut file = OpenOptions::new().create(true).append(true).open(path)?;
  file.write_all(output_entry(name, value).as_bytes())?;
  Ok(())
}

/// Sets a step output, falling back to the legacy stdout command when the
/// runner provides no output file.
pub fn set_output(name: &str, value: &str) -> Result<()> {
  debug!("setting output {name}={value}");
  match std::env::var_os("GITHUB_OUTPUT") {
    Some(path) if !path.is_empty() => write_output(Path::new(&path), name, value),
    _ => {
      println!("{}", set_output_command(name, value));
      Ok(())
    }
  }
}
