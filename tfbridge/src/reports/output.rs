//! Rendering targets for reports.

use std::io::{self, Write};

/// Where a report is rendered.
///
/// Reports call these in reading order; the target decides layout details
/// such as underlines and indentation.
pub trait Output {
    /// Underlined heading.
    fn heading(&mut self, text: &str);

    /// Label that opens an indented group.
    fn group(&mut self, label: &str);

    /// `name: value` inside a group.
    fn field(&mut self, name: &str, value: &str);

    /// Bullet inside a group.
    fn item(&mut self, text: &str);

    /// Error or warning line, kept apart from regular output.
    fn diagnostic(&mut self, text: &str);

    fn line(&mut self, text: &str);

    fn blank(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Writes regular lines to one stream and diagnostics to another.
pub struct TextOutput<W, E> {
    out: W,
    err: E,
}

pub type TerminalOutput = TextOutput<io::Stdout, io::Stderr>;

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write, E: Write> TextOutput<W, E> {
    // Rendering is best effort: a closed pipe must not abort the command.
    fn write_out(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write, E: Write> Output for TextOutput<W, E> {
    fn heading(&mut self, text: &str) {
        self.write_out(text);
        self.write_out(&"=".repeat(text.chars().count()));
    }

    fn group(&mut self, label: &str) {
        self.write_out(&format!("{}:", label));
    }

    fn field(&mut self, name: &str, value: &str) {
        self.write_out(&format!("  {}: {}", name, value));
    }

    fn item(&mut self, text: &str) {
        self.write_out(&format!("  - {}", text));
    }

    fn diagnostic(&mut self, text: &str) {
        let _ = writeln!(self.err, "{}", text);
    }

    fn line(&mut self, text: &str) {
        self.write_out(text);
    }

    fn blank(&mut self) {
        self.write_out("");
    }
}

/// Renders into a single in-memory buffer, diagnostics interleaved in order.
#[cfg(test)]
pub fn render_to_string(report: &dyn Report) -> String {
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Shared(Rc::default());
    let mut out = TextOutput {
        out: buffer.clone(),
        err: buffer.clone(),
    };
    report.render(&mut out);
    drop(out);
    let bytes = buffer.0.take();
    String::from_utf8(bytes).expect("report output is UTF-8")
}
