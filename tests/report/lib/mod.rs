use std::{
    io,
    sync::{Arc, Mutex},
};

use testit::{
    Testit,
    reporter::{
        common::color::{ColorSetting, SupportsColor},
        console::ConsoleReporter,
    },
    trace::TraceFilter,
};

mod sanitize;

pub use sanitize::*;

#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.flush()
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

impl Buffer {
    pub fn sanitized(&self) -> String {
        let guard = self.0.lock().unwrap();
        sanitize_report(&String::from_utf8_lossy(&guard))
    }
}

/// An engine printing uncolored, backtrace-free reports into `buffer`.
pub fn engine(buffer: &Buffer, expand_passed: bool) -> Testit {
    Testit::new()
        .with_reporter(
            ConsoleReporter::default()
                .with_target(buffer.clone())
                .with_color_setting(ColorSetting::Never)
                .with_expand_passed(expand_passed),
        )
        .with_trace_filter(TraceFilter::default().with_backtraces(false))
}
