//! Helpers shared by the reporter implementations.

use std::{fmt::Display, time::Duration};

pub mod color;

use color::colors::{NORMAL, RESET};

/// Paint `text` in `color`, or leave it untouched when colors are off.
pub(crate) fn paint(use_color: bool, color: &str, text: impl Display) -> String {
    match use_color && color != NORMAL {
        true => format!("{color}{text}{RESET}"),
        false => text.to_string(),
    }
}

/// Whole milliseconds, the unit every report uses for timings.
pub(crate) fn millis(elapsed: Duration) -> u128 {
    elapsed.as_millis()
}

#[cfg(test)]
mod tests {
    use super::{color::colors::*, *};

    #[test]
    fn paint_only_wraps_when_asked() {
        assert_eq!(paint(false, RED, "fail"), "fail");
        assert_eq!(paint(true, RED, "fail"), "\x1b[31mfail\x1b[0m");
        assert_eq!(paint(true, NORMAL, "undefined"), "undefined");
    }

    #[test]
    fn timings_are_truncated_to_milliseconds() {
        assert_eq!(millis(Duration::from_micros(2_999)), 2);
    }
}
