//! A reporter that forwards owned snapshots over a channel.
//!
//! The result tree holds reference-counted host values and can't leave the
//! thread that built it. A [`ChannelReporter`] copies what a consumer needs
//! into plain owned data first, so the receiving end may live on any thread.

use std::{io, time::Duration};

use crossbeam_channel::{Receiver, Sender};

use crate::{
    error::ErrorRecord,
    outcome::{Counts, Status},
    reporter::Reporter,
    tree::{GroupRef, NodeRef, TestRef},
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSnapshot {
    pub kind: String,
    pub message: String,
    pub trace: Option<String>,
}

impl From<&ErrorRecord> for ErrorSnapshot {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            kind: record.kind.clone(),
            message: record.message.clone(),
            trace: record.trace.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSnapshot {
    pub status: Option<Status>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub elapsed: Duration,
    pub trace: Option<String>,
    pub error: Option<ErrorSnapshot>,
    /// The captured arguments, already rendered.
    pub arguments: Vec<String>,
}

impl From<TestRef<'_>> for TestSnapshot {
    fn from(test: TestRef<'_>) -> Self {
        Self {
            status: test.status(),
            description: test.description().map(ToString::to_string),
            comment: test.comment().map(ToString::to_string),
            elapsed: test.elapsed(),
            trace: test.trace().map(ToString::to_string),
            error: test.error().map(ErrorSnapshot::from),
            arguments: test.arguments().iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub name: String,
    pub status: Option<Status>,
    pub counts: Counts,
    pub comment: Option<String>,
    pub elapsed: Duration,
    pub trace: Option<String>,
    pub error: Option<ErrorSnapshot>,
    pub children: Vec<NodeSnapshot>,
}

impl From<GroupRef<'_>> for GroupSnapshot {
    fn from(group: GroupRef<'_>) -> Self {
        Self {
            name: group.name().to_string(),
            status: group.status(),
            counts: group.counts(),
            comment: group.comment().map(ToString::to_string),
            elapsed: group.elapsed(),
            trace: group.trace().map(ToString::to_string),
            error: group.error().map(ErrorSnapshot::from),
            children: group.children().map(NodeSnapshot::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSnapshot {
    Group(GroupSnapshot),
    Test(TestSnapshot),
}

impl NodeSnapshot {
    pub fn status(&self) -> Option<Status> {
        match self {
            NodeSnapshot::Group(group) => group.status,
            NodeSnapshot::Test(test) => test.status,
        }
    }
}

impl From<NodeRef<'_>> for NodeSnapshot {
    fn from(node: NodeRef<'_>) -> Self {
        match node {
            NodeRef::Group(group) => NodeSnapshot::Group(group.into()),
            NodeRef::Test(test) => NodeSnapshot::Test(test.into()),
        }
    }
}

/// One call a [`ChannelReporter`] received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Error(ErrorSnapshot),
    Test(TestSnapshot),
    Group(GroupSnapshot),
    Print(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<ReportEvent>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<ReportEvent>) -> Self {
        Self { sender }
    }

    /// A reporter together with the receiving end of an unbounded channel.
    pub fn unbounded() -> (Self, Receiver<ReportEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    fn send(&self, event: ReportEvent) -> io::Result<()> {
        self.sender.send(event).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "report receiver disconnected")
        })
    }
}

impl Reporter for ChannelReporter {
    fn render_error(&mut self, error: &ErrorRecord) -> io::Result<()> {
        self.send(ReportEvent::Error(error.into()))
    }

    fn render_test(&mut self, test: TestRef<'_>) -> io::Result<()> {
        self.send(ReportEvent::Test(test.into()))
    }

    /// Sends the whole subtree as a single event.
    fn render_group(&mut self, group: GroupRef<'_>) -> io::Result<()> {
        self.send(ReportEvent::Group(group.into()))
    }

    fn print(&mut self, values: &[Value]) -> io::Result<()> {
        self.send(ReportEvent::Print(
            values.iter().map(ToString::to_string).collect(),
        ))
    }
}
