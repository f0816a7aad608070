//! tracing subscriber setup.
//!
//! Events are formatted by `tracing_subscriber::fmt` and handed to
//! [`crate::stderr_buffer`], so log lines never corrupt the TUI.

use std::io;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `gridpoints=trace`.
pub const LOG_ENV: &str = "GRIDPOINTS_LOG";

const DEFAULT_DIRECTIVE: &str = "gridpoints=warn";
const VERBOSE_DIRECTIVE: &str = "gridpoints=debug";

/// Collects one formatted event and forwards it when dropped.
pub struct BufferedLine {
    bytes: Vec<u8>,
}

impl io::Write for BufferedLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for BufferedLine {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.bytes);
        crate::stderr_buffer::write(text.trim_end_matches('\n').to_string());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = BufferedLine;

    fn make_writer(&'a self) -> Self::Writer {
        BufferedLine { bytes: Vec::new() }
    }
}

/// Pick the filter: `GRIDPOINTS_LOG` wins, then `--verbose`, then warn-only.
pub fn build_filter(verbose: bool) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        _ => EnvFilter::new(default_directive(verbose)),
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_target(verbose)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferedStderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "gridpoints=warn");
        assert_eq!(default_directive(true), "gridpoints=debug");
    }

    #[test]
    fn test_make_writer_accumulates() {
        use std::io::Write;
        let mut line = BufferedStderr.make_writer();
        line.write_all(b"hello ").unwrap();
        line.write_all(b"world\n").unwrap();
        assert_eq!(line.bytes, b"hello world\n");
        line.bytes.clear();
    }
}
