use std::fmt::{self, Display};

/// The determined outcome of a node. A node without a status has not been
/// determined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Fail,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Error => "error",
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Status::Pass)
    }

    pub fn failed(&self) -> bool {
        matches!(self, Status::Fail)
    }

    pub fn errored(&self) -> bool {
        matches!(self, Status::Error)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an optional status the way reports show it.
pub fn status_label(status: Option<Status>) -> &'static str {
    status.map(|s| s.as_str()).unwrap_or("undefined")
}

/// Tally of a group's direct children.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counts {
    pub pass: usize,
    pub fail: usize,
    pub error: usize,
    pub total: usize,
}

impl Counts {
    /// Count from scratch. Undetermined children add to `total` only.
    pub fn tally(statuses: impl IntoIterator<Item = Option<Status>>) -> Self {
        let mut counts = Counts::default();
        for status in statuses {
            counts.total += 1;
            match status {
                Some(Status::Pass) => counts.pass += 1,
                Some(Status::Fail) => counts.fail += 1,
                Some(Status::Error) => counts.error += 1,
                None => {}
            }
        }
        counts
    }

    /// The status these counts give a group, with `error > fail > pass` precedence.
    pub fn status(&self, has_error: bool) -> Status {
        if self.error > 0 || has_error {
            Status::Error
        } else if self.fail > 0 {
            Status::Fail
        } else {
            Status::Pass
        }
    }
}
