//! Shared fixtures and fakes for the harness's own tests.

pub mod loaders;
pub mod sample;

pub use fake_test::FakeTest;
pub use loaders::{CountingLoader, FailingLoader};
pub use sample::{SAMPLE_DOCUMENT_BASE, SAMPLE_SUITE, SAMPLE_SUITE_PATH, sample_loader, sample_suite};

/// Describe the first difference between two listings, with a little context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    const MISSING: &str = "<missing>";
    fn line(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or(MISSING)
    }

    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let first = (0..max).find(|&i| line(expected, i) != line(actual, i));
    match first {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(out, "first mismatch at line {} (showing {}..={}):", i + 1, start + 1, end);
            for idx in start..end {
                let marker = if idx == i { ">" } else { " " };
                let _ = writeln!(out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
                let _ = writeln!(out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
            }
        }
        None if expected.len() != actual.len() => {
            let _ = writeln!(out, "prefix matched but lengths differ");
        }
        None => {}
    }
    let _ = writeln!(
        out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Split `text` into owned lines, for use with [`diff_lines`].
pub fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
