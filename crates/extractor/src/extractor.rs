use crate::category::categorize;
use crate::filter::is_valid_example;
use crate::repair::repair_code;
use crate::types::{CodeExample, Complexity};
use docfinder_corpus::Document;
use once_cell::sync::Lazy;
use regex::Regex;

/// Window of body text considered before a block.
const CONTEXT_BEFORE: usize = 200;
/// Window of body text considered after a block.
const CONTEXT_AFTER: usize = 150;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[a-zA-Z0-9_+\-]*[ \t]*\n?(.*?)```").expect("fence pattern is valid")
});

/// Mine every valid fenced code block out of one document, in document
/// order. Invalid blocks are dropped silently.
#[must_use]
pub fn extract_from_document(document: &Document) -> Vec<CodeExample> {
    let body = document.content.as_str();
    let mut examples = Vec::new();

    for captures in FENCE_RE.captures_iter(body) {
        let whole = captures.get(0).expect("group 0 always present");
        let code = captures
            .get(1)
            .map(|m| m.as_str().trim_matches('\n'))
            .unwrap_or_default();

        let context_before = context_before(body, whole.start());
        let context_after = context_after(body, whole.end());

        let repaired = repair_code(code);
        let combined_context = format!("{context_before} {context_after}");
        if !is_valid_example(&repaired, &combined_context) {
            continue;
        }

        let lower = code.to_lowercase();
        examples.push(CodeExample {
            id: format!("{}#{}", document.id, whole.start()),
            document_id: document.id.clone(),
            title: document.title.clone(),
            url: document.url.clone(),
            code: code.to_string(),
            complexity: Complexity::from_line_count(repaired.lines().count()),
            category: categorize(&repaired, &document.title, &combined_context),
            has_comments: code.contains("//") || code.contains("/*"),
            uses_swiftui: lower.contains("swiftui") || lower.contains("some view"),
            repaired_code: repaired,
            context_before,
            context_after,
        });
    }

    log::debug!(
        "Extracted {} examples from document {}",
        examples.len(),
        document.id
    );
    examples
}

/// Text preceding the block, preferring a sentence or paragraph start
/// inside the window over a hard character cutoff.
fn context_before(body: &str, block_start: usize) -> String {
    let window_start = floor_char_boundary(body, block_start.saturating_sub(CONTEXT_BEFORE));
    // Whitespace touching the fence would otherwise win the boundary search.
    let window = body[window_start..block_start].trim_end();

    let boundary = window
        .rfind("\n\n")
        .map(|idx| idx + 2)
        .or_else(|| window.rfind(". ").map(|idx| idx + 2))
        .or_else(|| window.rfind(".\n").map(|idx| idx + 2));

    match boundary {
        Some(idx) if idx < window.len() => window[idx..].trim().to_string(),
        _ => window.trim().to_string(),
    }
}

/// Text following the block, preferring a sentence or paragraph end inside
/// the window.
fn context_after(body: &str, block_end: usize) -> String {
    if block_end >= body.len() {
        return String::new();
    }
    let window_end = ceil_char_boundary(body, (block_end + CONTEXT_AFTER).min(body.len()));
    let window = body[block_end..window_end].trim_start();

    let boundary = window
        .find("\n\n")
        .or_else(|| window.find(". ").map(|idx| idx + 1))
        .or_else(|| window.find(".\n").map(|idx| idx + 1));

    match boundary {
        Some(idx) => window[..idx].trim().to_string(),
        None => window.trim().to_string(),
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
