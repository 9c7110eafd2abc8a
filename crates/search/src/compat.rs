use docfinder_corpus::Document;
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::num::NonZeroUsize;

/// Bounded cache size; the corpus is large and the server long-running, so
/// the annotation cache must not grow with it.
const CACHE_CAPACITY: usize = 512;

/// Availability of a document's API on one platform, parsed from tags like
/// `"iOS 13.0+"` or `"macOS 11.0+ (Deprecated)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformAvailability {
    pub platform: String,
    pub introduced: Option<String>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityInfo {
    pub platforms: Vec<PlatformAvailability>,
}

static AVAILABILITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([a-z][a-z ]*?)\s*([0-9]+(?:\.[0-9]+)*)?\+?\s*(\(deprecated\))?\s*$")
        .expect("availability pattern is valid")
});

/// Derives platform compatibility annotations from document tags.
///
/// Annotation is best-effort: a document whose tags fail to parse degrades
/// to `None` instead of failing the batch it is part of. Results are cached
/// per document id in a fixed-capacity LRU.
pub struct CompatibilityAnalyzer {
    cache: LruCache<String, Option<CompatibilityInfo>>,
}

impl Default for CompatibilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompatibilityAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).expect("capacity is non-zero"),
            ),
        }
    }

    /// Annotate one document; `None` means it is untagged or its tags were
    /// unparsable.
    pub fn analyze(&mut self, document: &Document) -> Option<CompatibilityInfo> {
        if let Some(cached) = self.cache.get(&document.id) {
            return cached.clone();
        }
        let info = parse_platform_tags(&document.platforms);
        self.cache.put(document.id.clone(), info.clone());
        info
    }

    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

fn parse_platform_tags(tags: &[String]) -> Option<CompatibilityInfo> {
    // An untagged document gets no annotation rather than an empty one.
    if tags.is_empty() {
        return None;
    }
    let mut platforms = Vec::with_capacity(tags.len());
    for tag in tags {
        let captures = AVAILABILITY_RE.captures(tag)?;
        let platform = captures.get(1)?.as_str().trim().to_string();
        if platform.is_empty() {
            return None;
        }
        platforms.push(PlatformAvailability {
            platform,
            introduced: captures.get(2).map(|m| m.as_str().to_string()),
            deprecated: captures.get(3).is_some(),
        });
    }
    Some(CompatibilityInfo { platforms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with_tags(id: &str, tags: &[&str]) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            url: String::new(),
            content: String::new(),
            doc_type: None,
            description: None,
            platforms: tags.iter().map(|t| (*t).to_string()).collect(),
            frameworks: vec![],
        }
    }

    #[test]
    fn parses_versioned_tags() {
        let info = parse_platform_tags(&[
            "iOS 13.0+".to_string(),
            "macOS 11.0+ (Deprecated)".to_string(),
            "visionOS".to_string(),
        ])
        .unwrap();
        assert_eq!(
            info.platforms,
            vec![
                PlatformAvailability {
                    platform: "iOS".to_string(),
                    introduced: Some("13.0".to_string()),
                    deprecated: false,
                },
                PlatformAvailability {
                    platform: "macOS".to_string(),
                    introduced: Some("11.0".to_string()),
                    deprecated: true,
                },
                PlatformAvailability {
                    platform: "visionOS".to_string(),
                    introduced: None,
                    deprecated: false,
                },
            ]
        );
    }

    #[test]
    fn unparsable_tag_degrades_to_none() {
        assert!(parse_platform_tags(&["13.0+ ???".to_string()]).is_none());
    }

    #[test]
    fn untagged_document_gets_no_annotation() {
        assert!(parse_platform_tags(&[]).is_none());

        let mut analyzer = CompatibilityAnalyzer::new();
        let doc = doc_with_tags("untagged", &[]);
        assert_eq!(analyzer.analyze(&doc), None);
    }

    #[test]
    fn cache_is_bounded() {
        let mut analyzer = CompatibilityAnalyzer::new();
        for i in 0..(CACHE_CAPACITY + 64) {
            let doc = doc_with_tags(&format!("doc-{i}"), &["iOS 17.0+"]);
            analyzer.analyze(&doc);
        }
        assert_eq!(analyzer.cached_entries(), CACHE_CAPACITY);
    }

    #[test]
    fn cache_returns_same_annotation() {
        let mut analyzer = CompatibilityAnalyzer::new();
        let doc = doc_with_tags("doc", &["tvOS 16.0+"]);
        let first = analyzer.analyze(&doc);
        let second = analyzer.analyze(&doc);
        assert_eq!(first, second);
        assert_eq!(analyzer.cached_entries(), 1);
    }
}
