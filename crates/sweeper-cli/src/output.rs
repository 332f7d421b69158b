//! Failure reporting on the error stream.
//!
//! Nothing here writes to stdout.

use std::io::{self, Write};

use sweeper_core::SweeperError;

/// Write `err` to `writer`.
///
/// Tool failures are relayed as a label line followed by the tool's raw
/// captured output; other errors as a single message line.
pub fn write_failure<W: Write>(writer: &mut W, err: &SweeperError) -> io::Result<()> {
    match err.diagnostic() {
        Some((label, output)) => {
            writeln!(writer, "{label}")?;
            writer.write_all(output)?;
        }
        None => match err {
            SweeperError::UnsupportedPlatform { .. } => writeln!(writer, "{err}")?,
            _ => writeln!(writer, "Error: {err}")?,
        },
    }
    writer.flush()
}

/// Report `err` on stderr.
pub fn report_failure(err: &SweeperError) {
    let stderr = io::stderr();
    let mut lock = stderr.lock();
    // Nothing useful can be done if stderr itself is gone.
    let _ = write_failure(&mut lock, err);
}
