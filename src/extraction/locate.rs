//! Locating the JSON payload inside free-form model output.

use once_cell::sync::Lazy;
use regex::Regex;

/// A ```json fenced block holding one object. Non-greedy, so the first
/// closing fence after the object ends the match.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?i:json)\s*(\{.*?\})\s*```").expect("Invalid fenced JSON regex")
});

/// Candidate JSON object texts, in the order they should be tried.
///
/// A fenced block wins outright: when one is present it is the only
/// candidate. Otherwise every top-level balanced `{...}` in the text is
/// returned in order of appearance.
pub fn json_candidates(text: &str) -> Vec<&str> {
    if let Some(fenced) = fenced_json(text) {
        return vec![fenced];
    }
    balanced_objects(text)
}

/// The object inside the first ```json fence, if any.
pub fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Top-level balanced objects, skipping braces inside JSON string literals.
///
/// An object left open at the end of the text is dropped; scanning resumes
/// after the innermost brace still open so that a later complete object is
/// still found.
pub fn balanced_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut start = 0;

    while let Some(unclosed) = scan_objects(text, start, &mut objects) {
        start = unclosed + 1;
    }

    objects
}

/// One pass from `start`, pushing each top-level object it closes.
///
/// Returns the offset of the innermost `{` still open at the end of the
/// text. Quotes only open string literals while inside an object.
fn scan_objects<'a>(text: &'a str, start: usize, objects: &mut Vec<&'a str>) -> Option<usize> {
    let mut open: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'{' => open.push(i),
            b'"' if !open.is_empty() => in_string = true,
            b'}' => {
                if let Some(outer) = open.pop() {
                    if open.is_empty() {
                        objects.push(&text[outer..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    open.last().copied()
}
