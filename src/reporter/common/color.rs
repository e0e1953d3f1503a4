use std::io;

use crate::outcome::Status;

/// When a reporter should emit ANSI colors.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorSetting {
    /// Color only if the target looks like a terminal.
    #[default]
    Automatic,
    Always,
    Never,
}

impl From<bool> for ColorSetting {
    fn from(value: bool) -> Self {
        match value {
            true => ColorSetting::Always,
            false => ColorSetting::Never,
        }
    }
}

pub(crate) mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const NORMAL: &str = "";
}

/// The color a status is painted in.
pub(crate) fn status_color(status: Option<Status>) -> &'static str {
    match status {
        Some(Status::Pass) => colors::GREEN,
        Some(Status::Fail) => colors::RED,
        Some(Status::Error) => colors::YELLOW,
        None => colors::NORMAL,
    }
}

pub trait SupportsColor {
    fn supports_color(&self) -> bool;
}

impl<T: io::IsTerminal> SupportsColor for T {
    fn supports_color(&self) -> bool {
        self.is_terminal()
    }
}
