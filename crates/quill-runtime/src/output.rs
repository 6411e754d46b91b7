//! Output sinks for `print`

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Destination for printed values; one call per `print` statement
pub trait OutputSink {
    fn print(&mut self, text: &str);
}

/// Writes each line to standard output, flushing immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print(&mut self, text: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout is not an error for the program being run
        let _ = writeln!(handle, "{}", text);
        let _ = handle.flush();
    }
}

/// Collects printed lines into a shared buffer
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// the other to an interpreter.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines printed so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }
}

impl OutputSink for CaptureSink {
    fn print(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}
