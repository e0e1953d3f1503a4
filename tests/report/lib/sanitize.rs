use std::sync::LazyLock;

use regex::Regex;

static MILLIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches: (12 ms)
    Regex::new(r"\(\d+ ms\)").unwrap()
});

static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Example matches:
    //   tests\report\main.rs:40:13
    //   tests/report/main.rs:40:13
    Regex::new(r"(?P<path>tests[^\n:]+\.rs):(?P<line>\d+):(?P<col>\d+)").unwrap()
});

/// Replace everything that changes between runs: timings and source positions.
pub fn sanitize_report(input: &str) -> String {
    let tmp = MILLIS_RE.replace_all(input, "(<n> ms)");
    let tmp = PATH_RE.replace_all(tmp.as_ref(), |caps: &regex::Captures| {
        format!("{}:<line>:<col>", caps["path"].replace('\\', "/"))
    });
    tmp.into_owned()
}
