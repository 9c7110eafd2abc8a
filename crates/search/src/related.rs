use docfinder_corpus::vector::{centroid, cosine_similarity, decode_vector};
use docfinder_corpus::{CorpusStore, Document, ScoredResult};
use serde::Serialize;
use std::collections::HashSet;

/// At most this many primary results seed the centroid.
const MAX_SEED_RESULTS: usize = 3;
/// Candidates scored against the centroid, kept before classification.
const CANDIDATE_CAP: usize = 10;
/// Final related-result cap.
const OUTPUT_CAP: usize = 6;

/// How a discovered document relates to the original query and results.
///
/// Closed taxonomy; classification is total, so every candidate receives
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relationship {
    MigrationGuide,
    ModernAlternative,
    PerformanceGuide,
    CodeExample,
    LowLevelImplementation,
    ApiReference,
    PlatformSpecific,
    RelatedTopic,
}

impl Relationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MigrationGuide => "Migration Guide",
            Self::ModernAlternative => "Modern Alternative",
            Self::PerformanceGuide => "Performance Guide",
            Self::CodeExample => "Code Example",
            Self::LowLevelImplementation => "Low-Level Implementation",
            Self::ApiReference => "API Reference",
            Self::PlatformSpecific => "Platform Specific",
            Self::RelatedTopic => "Related Topic",
        }
    }
}

/// A discovered document with its centroid score and relationship label.
#[derive(Debug, Clone)]
pub struct RelatedResult {
    pub document: Document,
    pub score: f32,
    pub relationship: Relationship,
}

/// Discover documents topically related to the top primary results.
///
/// The seed results' stored vectors (never re-embedded) are averaged into a
/// centroid; the remaining corpus is scanned against it under a threshold
/// tiered on how strong the primary results were. Survivors are labeled by
/// [`classify`].
pub fn find_related(
    store: &CorpusStore,
    top_results: &[ScoredResult],
    original_query: &str,
) -> docfinder_corpus::Result<Vec<RelatedResult>> {
    let seeds = &top_results[..top_results.len().min(MAX_SEED_RESULTS)];
    if seeds.is_empty() {
        return Ok(Vec::new());
    }

    let mut seed_ids = HashSet::new();
    let mut seed_vectors = Vec::with_capacity(seeds.len());
    for seed in seeds {
        seed_ids.insert(seed.document.id.clone());
        // Invariant: every document has a stored embedding. A hole in the
        // snapshot just weakens the centroid instead of failing the call.
        if let Some(record) = store.get_record(&seed.document.id) {
            seed_vectors.push(decode_vector(&record.embedding));
        } else {
            log::warn!("No stored embedding for seed {}", seed.document.id);
        }
    }
    if seed_vectors.is_empty() {
        return Ok(Vec::new());
    }

    let center = centroid(&seed_vectors)?;
    let threshold = adaptive_threshold(seeds);
    log::debug!(
        "Related discovery: {} seeds, threshold {threshold}",
        seed_vectors.len()
    );

    let mut candidates = Vec::new();
    for record in store.records_excluding(&seed_ids) {
        let vector = decode_vector(&record.embedding);
        let score = cosine_similarity(&center, &vector)?;
        if score >= threshold {
            candidates.push((record, score));
        }
    }
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(CANDIDATE_CAP);

    let main_titles: Vec<String> = seeds.iter().map(|s| s.document.title_lower()).collect();
    let query_lower = original_query.to_lowercase();

    let mut related: Vec<RelatedResult> = candidates
        .into_iter()
        .map(|(record, score)| RelatedResult {
            relationship: classify(&record.document, &main_titles, &query_lower),
            document: record.document.clone(),
            score,
        })
        .collect();
    related.truncate(OUTPUT_CAP);
    Ok(related)
}

/// Threshold tiers keyed on the mean similarity of the seed results: strong
/// primaries can afford a tighter neighborhood, weak ones need a looser one.
fn adaptive_threshold(seeds: &[ScoredResult]) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let average = seeds.iter().map(|s| s.score).sum::<f32>() / seeds.len() as f32;
    if average > 0.6 {
        0.48
    } else if average < 0.4 {
        0.42
    } else {
        0.45
    }
}

struct RuleInput<'a> {
    /// Lower-cased candidate title
    title: &'a str,
    /// Lower-cased candidate body
    content: &'a str,
    /// Lower-cased titles of the seed results
    main_titles: &'a [String],
    /// Lower-cased original query
    query: &'a str,
}

struct Rule {
    relationship: Relationship,
    matches: fn(&RuleInput) -> bool,
}

const MIGRATION_TERMS: &[&str] = &["bringing", "migrat", "converting", "transition"];

const PERFORMANCE_TERMS: &[&str] = &["performance", "optimiz", "efficien"];

const SAMPLE_TERMS: &[&str] = &["sample", "example", "demo", "tutorial"];

/// Legacy framework named in a seed title, modern replacement in the
/// candidate title.
const MODERN_PAIRS: &[(&str, &str)] = &[
    ("scenekit", "realitykit"),
    ("uikit", "swiftui"),
    ("appkit", "swiftui"),
    ("opengl", "metal"),
];

/// High-level framework in the query, low-level backend in the candidate.
const LOW_LEVEL_PAIRS: &[(&str, &str)] = &[
    ("realitykit", "metal"),
    ("scenekit", "metal"),
    ("core image", "metal"),
];

const PLATFORM_NAMES: &[&str] = &["ios", "ipados", "macos", "watchos", "tvos", "visionos"];

const TYPE_KEYWORDS: &[&str] = &["class ", "struct ", "protocol ", "enum "];

/// Ordered rule table; first match wins.
const RULES: &[Rule] = &[
    Rule {
        relationship: Relationship::MigrationGuide,
        matches: |input| MIGRATION_TERMS.iter().any(|t| input.title.contains(t)),
    },
    Rule {
        relationship: Relationship::ModernAlternative,
        matches: |input| {
            MODERN_PAIRS.iter().any(|(legacy, modern)| {
                input.title.contains(modern)
                    && input.main_titles.iter().any(|t| t.contains(legacy))
            })
        },
    },
    Rule {
        relationship: Relationship::PerformanceGuide,
        matches: |input| PERFORMANCE_TERMS.iter().any(|t| input.title.contains(t)),
    },
    Rule {
        relationship: Relationship::CodeExample,
        matches: |input| SAMPLE_TERMS.iter().any(|t| input.title.contains(t)),
    },
    Rule {
        relationship: Relationship::LowLevelImplementation,
        matches: |input| {
            LOW_LEVEL_PAIRS.iter().any(|(high, low)| {
                input.query.contains(high) && input.title.contains(low)
            })
        },
    },
    Rule {
        relationship: Relationship::ApiReference,
        matches: |input| {
            let fenced_blocks = input.content.matches("```").count() / 2;
            let type_keywords: usize = TYPE_KEYWORDS
                .iter()
                .map(|k| input.content.matches(k).count())
                .sum();
            fenced_blocks >= 3 || type_keywords >= 2
        },
    },
    Rule {
        relationship: Relationship::PlatformSpecific,
        matches: |input| {
            // Word-level match so "scenarios" never reads as "ios".
            input
                .title
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| PLATFORM_NAMES.contains(&word))
        },
    },
];

/// Label a candidate's relationship to the seed results and original query.
///
/// Total function: falls through to [`Relationship::RelatedTopic`] when no
/// rule fires.
#[must_use]
pub fn classify(candidate: &Document, main_titles: &[String], query_lower: &str) -> Relationship {
    let title = candidate.title.to_lowercase();
    let content = candidate.content.to_lowercase();
    let input = RuleInput {
        title: &title,
        content: &content,
        main_titles,
        query: query_lower,
    };
    RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map_or(Relationship::RelatedTopic, |rule| rule.relationship)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfinder_corpus::vector::encode_vector;
    use docfinder_corpus::DocumentRecord;
    use pretty_assertions::assert_eq;

    fn doc(id: &str, title: &str, content: &str) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://developer.apple.com/documentation/{id}"),
            content: content.to_string(),
            doc_type: None,
            description: None,
            platforms: vec![],
            frameworks: vec![],
        }
    }

    fn record(id: &str, title: &str, vector: &[f32]) -> DocumentRecord {
        DocumentRecord {
            document: doc(id, title, ""),
            embedding: encode_vector(vector),
        }
    }

    fn seed(id: &str, title: &str, score: f32) -> ScoredResult {
        ScoredResult {
            document: doc(id, title, ""),
            score,
        }
    }

    #[test]
    fn classify_is_total_and_ordered() {
        let main = vec!["scenekit overview".to_string()];
        let cases = [
            ("Migrating from SceneKit to RealityKit", "", "scenekit"),
            ("RealityKit essentials", "", "scenekit"),
            ("Improving rendering performance", "", "metal"),
            ("Building a sample camera app", "", "camera"),
            ("Metal shading basics", "", "realitykit rendering"),
            ("Type reference", "class Foo {} struct Bar {}", "types"),
            ("Building for visionOS", "", "spatial"),
            ("Human Interface Guidelines", "", "design"),
        ];
        let expected = [
            Relationship::MigrationGuide,
            Relationship::ModernAlternative,
            Relationship::PerformanceGuide,
            Relationship::CodeExample,
            Relationship::LowLevelImplementation,
            Relationship::ApiReference,
            Relationship::PlatformSpecific,
            Relationship::RelatedTopic,
        ];
        for ((title, content, query), want) in cases.iter().zip(expected.iter()) {
            let got = classify(&doc("x", title, content), &main, query);
            assert_eq!(got, *want, "title: {title}");
        }
    }

    #[test]
    fn migration_rule_outranks_api_reference() {
        // Both rule 1 and rule 6 match; order decides.
        let candidate = doc(
            "x",
            "Bringing your scene to RealityKit",
            "```swift\nfoo\n```\n```swift\nbar\n```\n```swift\nbaz\n```",
        );
        assert_eq!(
            classify(&candidate, &[], ""),
            Relationship::MigrationGuide
        );
    }

    #[test]
    fn platform_rule_requires_word_match() {
        assert_eq!(
            classify(&doc("x", "Common scenarios", ""), &[], ""),
            Relationship::RelatedTopic
        );
        assert_eq!(
            classify(&doc("x", "Drawing on iOS", ""), &[], ""),
            Relationship::PlatformSpecific
        );
    }

    #[test]
    fn discovery_caps_output_and_never_echoes_seeds() {
        // Seeds cluster near [1, 0]; a dozen candidates sit close by.
        let mut records = vec![
            record("seed-a", "Seed A", &[1.0, 0.0]),
            record("seed-b", "Seed B", &[0.99, 0.14]),
        ];
        for i in 0..12 {
            records.push(record(
                &format!("cand-{i}"),
                &format!("Candidate {i}"),
                &[0.95, 0.31],
            ));
        }
        let store = CorpusStore::from_records(records);

        let seeds = vec![seed("seed-a", "Seed A", 0.9), seed("seed-b", "Seed B", 0.8)];
        let related = find_related(&store, &seeds, "metal").unwrap();

        assert!(related.len() <= 6);
        assert!(!related.is_empty());
        assert!(related
            .iter()
            .all(|r| r.document.id != "seed-a" && r.document.id != "seed-b"));
    }

    #[test]
    fn discovery_with_no_seeds_is_empty() {
        let store = CorpusStore::from_records(vec![record("a", "A", &[1.0, 0.0])]);
        assert!(find_related(&store, &[], "query").unwrap().is_empty());
    }

    #[test]
    fn threshold_tiers() {
        let strong = vec![seed("a", "A", 0.9), seed("b", "B", 0.7)];
        assert_eq!(adaptive_threshold(&strong), 0.48);

        let weak = vec![seed("a", "A", 0.3), seed("b", "B", 0.35)];
        assert_eq!(adaptive_threshold(&weak), 0.42);

        let middling = vec![seed("a", "A", 0.5)];
        assert_eq!(adaptive_threshold(&middling), 0.45);
    }
}
