use std::sync::LazyLock;

use regex::Regex;

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Example matches:
    //   (at tests\scenarios\reporter.rs:14:34)
    //   (at tests/scenarios/reporter.rs:14:34)
    Regex::new(r"\(at (?P<path>[^\n:]+\.rs):(?P<line>\d+):(?P<col>\d+)\)").unwrap()
});

/// Replace panic locations with `(at <file>)` keeping only the file name.
pub fn sanitize_locations(input: &str) -> String {
    LOCATION_RE
        .replace_all(input, |caps: &regex::Captures| {
            let path = caps["path"].replace('\\', "/");
            let file = path.rsplit('/').next().unwrap_or(&path).to_string();
            format!("(at {file})")
        })
        .to_string()
}
