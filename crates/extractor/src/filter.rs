//! Validity filtering for mined blocks. Rejected blocks are dropped
//! silently; this is ranking hygiene, not an error path.

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_CODE_LEN: usize = 10;
const MIN_BARE_VARIABLE_CONTEXT: usize = 20;
const MAX_ARTIFACT_RATIO: f32 = 0.3;

/// A type declaration with nothing inside its braces (or no braces at all).
static BARE_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:public|private|internal|open|final)\s+)*(?:class|struct|enum|protocol|actor)\s+\w+[^{}]*\{?\s*\}?$")
        .expect("bare-type pattern is valid")
});

/// Residue the comma-corruption repair can leave behind.
const ARTIFACT_PATTERNS: &[&str] = &["{ ,", ", }", ",}", "{,", ", ,"];

/// Decide whether a repaired block is worth returning.
///
/// Ordered rejection rules, first match drops the block:
/// trivially short, bare type declaration, lone import, lone variable
/// declaration with next to no surrounding context, or dominated by repair
/// artifacts.
#[must_use]
pub fn is_valid_example(code: &str, context: &str) -> bool {
    let trimmed = code.trim();
    if trimmed.len() < MIN_CODE_LEN {
        return false;
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() == 1 {
        let line = lines[0].trim();
        if BARE_TYPE_RE.is_match(line) {
            return false;
        }
        if line.starts_with("import ") {
            return false;
        }
        if (line.starts_with("let ") || line.starts_with("var "))
            && context.trim().len() < MIN_BARE_VARIABLE_CONTEXT
        {
            return false;
        }
    }

    let artifact_lines = lines
        .iter()
        .filter(|line| ARTIFACT_PATTERNS.iter().any(|p| line.contains(p)))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let artifact_ratio = artifact_lines as f32 / lines.len() as f32;
    artifact_ratio <= MAX_ARTIFACT_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_trivially_short_blocks() {
        assert!(!is_valid_example("let x=1", "plenty of surrounding context here"));
    }

    #[test]
    fn rejects_single_bare_import() {
        assert!(!is_valid_example("import Foundation", "some context around it"));
    }

    #[test]
    fn rejects_bare_type_declaration() {
        assert!(!is_valid_example("struct ContentView: View {}", ""));
        assert!(!is_valid_example("public final class Renderer {}", ""));
    }

    #[test]
    fn rejects_lone_variable_without_context() {
        assert!(!is_valid_example("let configuration = Configuration()", "short"));
        // Same line with real context survives.
        assert!(is_valid_example(
            "let configuration = Configuration()",
            "Create the session configuration before starting the AR session."
        ));
    }

    #[test]
    fn accepts_function_body() {
        let code = "func greet(name: String) -> String {\n    let message = \"Hello, \\(name)\"\n    return message\n}";
        assert!(is_valid_example(code, ""));
    }

    #[test]
    fn rejects_artifact_dominated_blocks() {
        let code = "let a = 1{ ,\nlet b = 2, }\nlet c = 3,}\nlet d = 4";
        assert!(!is_valid_example(code, ""));
    }
}
