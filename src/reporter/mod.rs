//! Rendering of finished results.
//!
//! A [`Reporter`] receives nodes of the result tree when a chain is
//! [done](crate::ChainView::done), and raw values handed to
//! [`Testit::print`](crate::Testit::print). The engine does not care where the
//! output goes: the [`ConsoleReporter`](console::ConsoleReporter) writes
//! indented text, the [`ChannelReporter`](channel::ChannelReporter) sends owned
//! snapshots to another thread and the [`NoReporter`](no::NoReporter) drops
//! everything.
//!
//! Reporters are handed borrowed views into the tree. Group rendering is
//! expected to recurse into the children; [`walk`] does that by dispatching
//! each child back through [`Reporter::render`].

use std::io;

use crate::{
    error::ErrorRecord,
    tree::{GroupRef, NodeRef, TestRef},
    value::Value,
};

pub mod channel;
pub mod common;
pub mod console;
pub mod no;

pub trait Reporter {
    fn render_error(&mut self, error: &ErrorRecord) -> io::Result<()>;

    fn render_test(&mut self, test: TestRef<'_>) -> io::Result<()>;

    /// Render a group, including its children.
    fn render_group(&mut self, group: GroupRef<'_>) -> io::Result<()>;

    /// Dump raw values, the way a console prints its arguments.
    fn print(&mut self, values: &[Value]) -> io::Result<()>;

    /// Render any node with the matching method.
    fn render(&mut self, node: NodeRef<'_>) -> io::Result<()> {
        match node {
            NodeRef::Group(group) => self.render_group(group),
            NodeRef::Test(test) => self.render_test(test),
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn render_error(&mut self, error: &ErrorRecord) -> io::Result<()> {
        (**self).render_error(error)
    }

    fn render_test(&mut self, test: TestRef<'_>) -> io::Result<()> {
        (**self).render_test(test)
    }

    fn render_group(&mut self, group: GroupRef<'_>) -> io::Result<()> {
        (**self).render_group(group)
    }

    fn print(&mut self, values: &[Value]) -> io::Result<()> {
        (**self).print(values)
    }
}

/// Render every child of `group` in report order.
pub fn walk<R: Reporter + ?Sized>(reporter: &mut R, group: GroupRef<'_>) -> io::Result<()> {
    group
        .children()
        .try_for_each(|child| reporter.render(child))
}
