//! Output formatting

use console::{style, Term};

/// Writes command results to stdout and status lines to stderr
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        console::set_colors_enabled(use_color);
        console::set_colors_enabled_stderr(use_color);
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a result line (always shown, even in quiet mode)
    pub fn value(&self, line: &str) -> std::io::Result<()> {
        self.out.write_line(line)
    }

    /// Print a multi-line block verbatim
    pub fn block(&self, text: &str) -> std::io::Result<()> {
        self.out.write_str(text)?;
        if !text.ends_with('\n') {
            self.out.write_line("")?;
        }
        Ok(())
    }

    /// Print a success status line
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.err
            .write_line(&format!("{} {message}", style("✓").green().bold()))
    }

    /// Print an informational status line
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.err.write_line(&format!("{} {message}", style("•").cyan()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_flags() {
        let reporter = Reporter::new(false, true);
        assert!(reporter.quiet);
        assert!(!reporter.use_color);
        assert!(reporter.success("done").is_ok());
    }
}
