//! Colored status messages on stderr.
//!
//! Rendered HTML goes to stdout, so everything meant for the user lands here.

use std::path::Path;

use console::{Style, Term};

/// Status reporter for CLI commands.
pub(crate) struct Output {
    term: Term,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    /// Report a written output file (green).
    pub(crate) fn written(&self, path: &Path, bytes: usize) {
        self.line(&self.done, &format!("Wrote {bytes} bytes to {}", path.display()));
    }

    /// Yellow.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn, msg);
    }

    /// Red, bold.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.fail, msg);
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
