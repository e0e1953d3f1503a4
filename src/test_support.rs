use std::{cell::RefCell, io, rc::Rc};

use crossbeam_channel::Receiver;

use crate::{
    Testit,
    outcome::Status,
    reporter::{
        channel::{ChannelReporter, ReportEvent},
        common::color::SupportsColor,
        no::NoReporter,
    },
    tree::Tree,
};

/// A shared in-memory target, so a test can read what a reporter it gave
/// away has written.
#[derive(Debug, Default, Clone)]
pub struct Buffer(Rc<RefCell<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

/// An engine that reports nowhere.
pub fn engine() -> Testit {
    Testit::new().with_reporter(NoReporter)
}

/// An engine whose reports can be received.
pub fn channel_engine() -> (Testit, Receiver<ReportEvent>) {
    let (reporter, receiver) = ChannelReporter::unbounded();
    (Testit::new().with_reporter(reporter), receiver)
}

/// A root group holding one argument-less test per status, recounted.
pub fn status_tree(statuses: &[Status]) -> Tree {
    let mut tree = Tree::new("root");
    let root = tree.root();
    for &status in statuses {
        let id = tree.add_test(root, None, Vec::new(), status, None);
        tree.attach(root, id);
    }
    tree.recount(root);
    tree
}
