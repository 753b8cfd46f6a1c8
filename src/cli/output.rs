//! Colored terminal output for packaging runs

use std::io::Write;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Progress goes to stdout and honours `--quiet`; failures go to stderr
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a success line
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.stdout_line(|buf| marked(buf, "✓", Color::Green, false, message))
    }

    /// Print a warning line
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.stdout_line(|buf| marked(buf, "⚠", Color::Yellow, true, message))
    }

    /// Print an entry under the previous line
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.stdout_line(|buf| writeln!(buf, "    {message}"))
    }

    /// Print a plain line
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.stdout_line(|buf| writeln!(buf, "{message}"))
    }

    /// Print an error line and its recovery suggestions to stderr, even when quiet
    pub fn failure(&self, message: &str, suggestions: &[String]) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let written = marked(&mut buffer, "✗", Color::Red, true, message).and_then(|()| {
            if !suggestions.is_empty() {
                writeln!(buffer, "\nRecovery suggestions:")?;
            }
            for suggestion in suggestions {
                writeln!(buffer, "  • {suggestion}")?;
            }
            Ok(())
        });

        if written.and_then(|()| bufwtr.print(&buffer)).is_err() {
            println!("✗ {message}");
        }
    }

    fn stdout_line(
        &self,
        write: impl FnOnce(&mut Buffer) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        write(&mut buffer)?;
        bufwtr.print(&buffer)
    }
}

/// Bold colored symbol, then the message (colored too when `tint` is set)
fn marked(
    buffer: &mut Buffer,
    symbol: &str,
    color: Color,
    tint: bool,
    message: &str,
) -> std::io::Result<()> {
    buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(buffer, "{symbol}")?;
    buffer.reset()?;
    if tint {
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
    }
    writeln!(buffer, " {message}")?;
    buffer.reset()
}
