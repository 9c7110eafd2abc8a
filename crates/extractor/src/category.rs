use crate::types::Category;

/// Ordered keyword table; evaluated top to bottom, first match wins.
///
/// Keywords are matched against the lower-cased concatenation of the code,
/// the owning document title, and the surrounding context.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::UiControls,
        &["button", "toggle", "slider", "stepper", "picker", "textfield", "text field"],
    ),
    (
        Category::Navigation,
        &["navigationstack", "navigationview", "navigationlink", "tabview", "navigation"],
    ),
    (
        Category::Lists,
        &["foreach", "lazyvstack", "lazyhstack", "list {", "list(", "collection view", "table view"],
    ),
    (
        Category::StateManagement,
        &["@state", "@binding", "@observedobject", "@stateobject", "@environment", "observable"],
    ),
    (
        Category::Layout,
        &["vstack", "hstack", "zstack", "grid", "geometryreader", "alignment", "layout"],
    ),
    (
        Category::Animation,
        &["withanimation", "animation", "transition", "keyframe", "spring"],
    ),
    (
        Category::Networking,
        &["urlsession", "urlrequest", "websocket", "http", "download", "network"],
    ),
    (
        Category::Persistence,
        &["swiftdata", "coredata", "core data", "userdefaults", "filemanager", "keychain", "sqlite"],
    ),
    (
        Category::Graphics,
        &["metal", "cgcontext", "core graphics", "shader", "render", "draw"],
    ),
    (
        Category::AugmentedReality,
        &["arkit", "realitykit", "anchorentity", "immersive", "arview"],
    ),
    (
        Category::Widgets,
        &["widgetkit", "widget", "live activity", "timelineprovider"],
    ),
    (
        Category::WatchApps,
        &["watchkit", "watchos", "complication", "workout"],
    ),
    (
        Category::SystemIntegration,
        &["notification", "app intent", "siri", "shortcut", "spotlight", "share extension"],
    ),
    (
        Category::Testing,
        &["xctest", "xcuiapplication", "@test", "assert", "unit test"],
    ),
    (
        Category::Concurrency,
        &["async", "await", "actor", "task {", "dispatchqueue", "combine"],
    ),
    (
        Category::Accessibility,
        &["accessibility", "voiceover", "dynamic type"],
    ),
];

/// Assign the topic bucket for one example.
#[must_use]
pub fn categorize(code: &str, title: &str, context: &str) -> Category {
    let haystack = format!("{code}\n{title}\n{context}").to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map_or(Category::General, |(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_matching_rule_wins() {
        // "button" (UiControls) and "navigationlink" (Navigation) both
        // appear; UiControls is evaluated first.
        let category = categorize(
            "NavigationLink { Button(\"Tap\") {} }",
            "Adding navigation",
            "",
        );
        assert_eq!(category, Category::UiControls);
    }

    #[test]
    fn title_and_context_participate() {
        let category = categorize("let x = 1", "Animating views", "");
        assert_eq!(category, Category::Animation);

        let category = categorize("let x = 1", "Untitled", "fetch it over http later");
        assert_eq!(category, Category::Networking);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(categorize("let x = 1", "A page", "plain prose"), Category::General);
    }

    #[test]
    fn state_wrappers_categorize_before_concurrency() {
        // "task {" would match Concurrency, but "@state" sits higher in the
        // table.
        let category = categorize(
            "@State private var isOn = false\ntask { await refresh() }",
            "Refreshing",
            "",
        );
        assert_eq!(category, Category::StateManagement);
    }
}
