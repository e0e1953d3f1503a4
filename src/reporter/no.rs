use std::io;

use crate::{
    error::ErrorRecord,
    reporter::Reporter,
    tree::{GroupRef, TestRef},
    value::Value,
};

/// A reporter that produces no output.
///
/// Useful when results are only inspected through
/// [`ChainView::result`](crate::ChainView::result) or the tree itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReporter;

impl Reporter for NoReporter {
    fn render_error(&mut self, _: &ErrorRecord) -> io::Result<()> {
        Ok(())
    }

    fn render_test(&mut self, _: TestRef<'_>) -> io::Result<()> {
        Ok(())
    }

    fn render_group(&mut self, _: GroupRef<'_>) -> io::Result<()> {
        Ok(())
    }

    fn print(&mut self, _: &[Value]) -> io::Result<()> {
        Ok(())
    }
}
