use serde::{Deserialize, Serialize};

/// A documentation page as ingested into the corpus snapshot.
///
/// Documents are immutable: the ingestion pipeline that produces the
/// snapshot is a separate tool, and this engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Opaque stable identifier
    pub id: String,

    /// Page title
    pub title: String,

    /// Canonical URL of the page
    pub url: String,

    /// Full text body (markdown with fenced code blocks)
    pub content: String,

    /// Page kind (article, sample-code, reference, ...)
    #[serde(default)]
    pub doc_type: Option<String>,

    /// Short abstract, when the source page carried one
    #[serde(default)]
    pub description: Option<String>,

    /// Platform availability tags, e.g. "iOS 13.0+"
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Frameworks the page belongs to, e.g. "SwiftUI"
    #[serde(default)]
    pub frameworks: Vec<String>,
}

/// A document together with its pre-computed embedding.
///
/// The embedding is stored as packed little-endian IEEE-754 f32 bytes;
/// dimensionality is constant across a corpus (3072 for the default
/// text-embedding-3-large snapshot). Every document has exactly one
/// embedding with a matching id — the snapshot builder guarantees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRecord {
    pub document: Document,

    /// Packed f32 LE bytes, length = dimension * 4
    pub embedding: Vec<u8>,
}

/// A document scored against a query vector. Produced per search call.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub document: Document,

    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

/// Corpus-level summary for the statistics operation.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    pub total_documents: usize,
    pub sample_titles: Vec<String>,
}

impl Document {
    /// Lower-cased title, used by heuristic classification rules.
    #[must_use]
    pub fn title_lower(&self) -> String {
        self.title.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_optional_fields_default_when_absent() {
        let json = r#"{
            "id": "doc-swiftui-state",
            "title": "Managing state in SwiftUI",
            "url": "https://developer.apple.com/documentation/swiftui/state",
            "content": "State is a property wrapper."
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert!(doc.doc_type.is_none());
        assert!(doc.platforms.is_empty());
        assert!(doc.frameworks.is_empty());
    }
}
