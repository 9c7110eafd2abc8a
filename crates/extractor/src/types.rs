use serde::Serialize;

/// One mined code example. Recomputed on every extraction call; nothing is
/// cached across documents.
#[derive(Debug, Clone, Serialize)]
pub struct CodeExample {
    /// Document id + byte offset of the fence, e.g. `"swiftui/state#412"`
    pub id: String,

    /// Owning document
    pub document_id: String,
    pub title: String,
    pub url: String,

    /// Code exactly as found between the fences
    pub code: String,

    /// Format-repaired variant (identical to `code` when no corruption was
    /// detected)
    pub repaired_code: String,

    /// Sentence-level text preceding the block
    pub context_before: String,

    /// Sentence-level text following the block
    pub context_after: String,

    pub category: Category,
    pub complexity: Complexity,

    /// Block contains `//` or `/* */` comments
    pub has_comments: bool,

    /// Block references SwiftUI
    pub uses_swiftui: bool,
}

/// Topic bucket for a code example. Closed set; assignment is
/// first-match-wins over an ordered keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    UiControls,
    Navigation,
    Lists,
    StateManagement,
    Layout,
    Animation,
    Networking,
    Persistence,
    Graphics,
    AugmentedReality,
    Widgets,
    WatchApps,
    SystemIntegration,
    Testing,
    Concurrency,
    Accessibility,
    General,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UiControls => "ui-controls",
            Self::Navigation => "navigation",
            Self::Lists => "lists",
            Self::StateManagement => "state-management",
            Self::Layout => "layout",
            Self::Animation => "animation",
            Self::Networking => "networking",
            Self::Persistence => "persistence",
            Self::Graphics => "graphics",
            Self::AugmentedReality => "augmented-reality",
            Self::Widgets => "widgets",
            Self::WatchApps => "watch-apps",
            Self::SystemIntegration => "system-integration",
            Self::Testing => "testing",
            Self::Concurrency => "concurrency",
            Self::Accessibility => "accessibility",
            Self::General => "general",
        }
    }
}

/// Size bucket computed on the repaired code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    #[must_use]
    pub const fn from_line_count(lines: usize) -> Self {
        if lines <= 3 {
            Self::Simple
        } else if lines <= 10 {
            Self::Medium
        } else {
            Self::Complex
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_buckets() {
        assert_eq!(Complexity::from_line_count(1), Complexity::Simple);
        assert_eq!(Complexity::from_line_count(3), Complexity::Simple);
        assert_eq!(Complexity::from_line_count(4), Complexity::Medium);
        assert_eq!(Complexity::from_line_count(10), Complexity::Medium);
        assert_eq!(Complexity::from_line_count(11), Complexity::Complex);
    }
}
