use std::io;

use crate::{
    error::ErrorRecord,
    outcome::{Status, status_label},
    reporter::{
        Reporter,
        common::{
            color::{ColorSetting, SupportsColor, colors::*, status_color},
            millis, paint,
        },
        walk,
    },
    tree::{GroupRef, TestRef},
    value::Value,
};

const INDENT: usize = 2;

/// An indented, console-style text reporter.
///
/// Every node renders a header line. Nodes that did not pass are expanded
/// below their header with description, trace, children, error and
/// arguments; passing nodes stay collapsed unless
/// [`with_expand_passed`](Self::with_expand_passed) is set.
///
/// A group header reads `name - status - pass/fail/error (time ms)`, a test
/// header reads `status (time ms)`, both followed by `: comment` if the node
/// carries one. Tests show their time only if it was measured.
#[derive(Debug)]
pub struct ConsoleReporter<W: io::Write> {
    target: W,
    color_setting: ColorSetting,
    expand_passed: bool,
    depth: usize,
}

impl Default for ConsoleReporter<io::Stdout> {
    fn default() -> Self {
        Self {
            target: io::stdout(),
            color_setting: Default::default(),
            expand_passed: false,
            depth: 0,
        }
    }
}

impl<W: io::Write> ConsoleReporter<W> {
    pub fn with_target<WithTarget: io::Write>(
        self,
        with_target: WithTarget,
    ) -> ConsoleReporter<WithTarget> {
        ConsoleReporter {
            target: with_target,
            color_setting: self.color_setting,
            expand_passed: self.expand_passed,
            depth: self.depth,
        }
    }

    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        ConsoleReporter {
            color_setting: color_setting.into(),
            ..self
        }
    }

    pub fn with_expand_passed(self, expand_passed: bool) -> Self {
        ConsoleReporter {
            expand_passed,
            ..self
        }
    }

    pub fn target(&self) -> &W {
        &self.target
    }

    pub fn into_target(self) -> W {
        self.target
    }

    fn expanded(&self, status: Option<Status>) -> bool {
        self.expand_passed || status != Some(Status::Pass)
    }

    /// Write every line of `text` at the current depth.
    fn lines(&mut self, text: &str) -> io::Result<()> {
        let indent = self.depth * INDENT;
        for line in text.lines() {
            writeln!(self.target, "{:indent$}{line}", "")?;
        }
        Ok(())
    }

    /// Run `body` one level deeper, restoring the depth even if it fails.
    fn nested(&mut self, body: impl FnOnce(&mut Self) -> io::Result<()>) -> io::Result<()> {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }
}

impl<W: io::Write + SupportsColor> ConsoleReporter<W> {
    /// Return whether this reporter will currently emit colored output.
    pub fn use_color(&self) -> bool {
        match self.color_setting {
            ColorSetting::Automatic => self.target.supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }

    fn status(&self, status: Option<Status>) -> String {
        paint(self.use_color(), status_color(status), status_label(status))
    }
}

impl<W: io::Write + SupportsColor> Reporter for ConsoleReporter<W> {
    fn render_error(&mut self, error: &ErrorRecord) -> io::Result<()> {
        let kind = paint(self.use_color(), YELLOW, &error.kind);
        self.lines(&format!("{kind}: {}", error.message))?;
        if let Some(trace) = &error.trace {
            self.nested(|this| this.lines(trace))?;
        }
        Ok(())
    }

    fn render_test(&mut self, test: TestRef<'_>) -> io::Result<()> {
        let mut header = self.status(test.status());
        if !test.elapsed().is_zero() {
            let time = paint(self.use_color(), CYAN, millis(test.elapsed()));
            header.push_str(&format!(" ({time} ms)"));
        }
        if let Some(comment) = test.comment() {
            header.push_str(&format!(": {comment}"));
        }
        self.lines(&header)?;

        if !self.expanded(test.status()) {
            return Ok(());
        }
        self.nested(|this| {
            if let Some(description) = test.description() {
                this.lines(description)?;
            }
            if let Some(trace) = test.trace() {
                this.lines(trace)?;
            }
            if let Some(error) = test.error() {
                this.render_error(error)?;
            }
            this.lines(&Value::array(test.arguments().to_vec()).to_string())
        })
    }

    fn render_group(&mut self, group: GroupRef<'_>) -> io::Result<()> {
        let use_color = self.use_color();
        let counts = group.counts();
        let mut header = format!(
            "{} - {} - {}/{}/{} ({} ms)",
            group.name(),
            self.status(group.status()),
            paint(use_color, GREEN, counts.pass),
            paint(use_color, RED, counts.fail),
            paint(use_color, YELLOW, counts.error),
            paint(use_color, CYAN, millis(group.elapsed())),
        );
        if let Some(comment) = group.comment() {
            header.push_str(&format!(": {comment}"));
        }
        self.lines(&header)?;

        if !self.expanded(group.status()) {
            return Ok(());
        }
        self.nested(|this| {
            if let Some(trace) = group.trace() {
                this.lines(trace)?;
            }
            walk(this, group)?;
            match group.error() {
                Some(error) => this.render_error(error),
                None => Ok(()),
            }
        })
    }

    fn print(&mut self, values: &[Value]) -> io::Result<()> {
        let line = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.target, "{line}")
    }
}
