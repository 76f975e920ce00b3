mod common;

use common::FakePage;
use cookidump::cleanup::{apply, list_page_rules, CleanupRule, Target};
use cookidump::ScrapeError;

#[tokio::test]
async fn test_apply_runs_rules_in_order() {
    let page = FakePage::new(|_| 0).with_state(|s| {
        s.missing.insert("core-feedback".to_string());
    });
    let rules = vec![
        CleanupRule::remove_all("script"),
        CleanupRule::remove_first("core-feedback"),
        CleanupRule::set_attribute("link", "href", "../../css/core.css").target(Target::Nth(0)),
    ];

    let matched = apply(&page, &rules).await.unwrap();

    assert_eq!(matched, 2);
    let state = page.state();
    let selectors: Vec<_> = state
        .scripts
        .iter()
        .map(|(_, args)| args[0].as_str().unwrap().to_string())
        .collect();
    assert_eq!(selectors, vec!["script", "core-feedback", "link"]);
    assert_eq!(state.scripts[2].1[1], "nth");
    assert_eq!(state.scripts[2].1[5], "../../css/core.css");
}

#[tokio::test]
async fn test_required_rule_without_match_fails() {
    let page = FakePage::new(|_| 0).with_state(|s| {
        s.missing.insert("core-transclude".to_string());
    });
    let rules = vec![
        CleanupRule::remove_first("core-transclude").required(),
        CleanupRule::remove_all("noscript"),
    ];

    let err = apply(&page, &rules).await.unwrap_err();

    assert!(matches!(err, ScrapeError::MissingElement(ref s) if s == "core-transclude"));
    // Later rules are not applied
    assert_eq!(page.state().scripts.len(), 1);
}

#[tokio::test]
async fn test_list_page_tolerates_missing_widgets() {
    let page = FakePage::new(|_| 0).with_state(|s| {
        s.missing.insert("filter-modal".to_string());
        s.missing.insert("#onetrust-consent-sdk".to_string());
    });
    let rules = list_page_rules();

    let matched = apply(&page, &rules).await.unwrap();

    assert_eq!(matched, rules.len() - 2);
}
