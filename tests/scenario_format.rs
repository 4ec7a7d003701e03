//! Integration tests over the shipped scenario files
//!
//! These verify the recorded admin-console flows parse, validate, and
//! keep the properties the application's CI relies on: literal record
//! URLs, navigation gating around login and delete confirmation, and the
//! EN/ET pair staying structurally identical.

use std::path::PathBuf;

use uitest::scenario::runner::load_scenario;
use uitest::{Scenario, Selector, Step};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn load(name: &str) -> Scenario {
    load_scenario(&scenario_path(name)).expect("shipped scenario must load")
}

/// Step kind tag, used to compare flows structurally
fn kind(step: &Step) -> &'static str {
    match step {
        Step::Goto { .. } => "goto",
        Step::Click { .. } => "click",
        Step::Fill { .. } => "fill",
        Step::SelectOption { .. } => "select_option",
        Step::Press { .. } => "press",
        Step::WaitForNavigation { .. } => "wait_for_navigation",
        Step::AssertUrl { .. } => "assert_url",
    }
}

#[test]
fn shipped_scenarios_load_and_validate() {
    for name in ["admin_index_en.yaml", "admin_index_et.yaml"] {
        let scenario = load(name);
        assert!(!scenario.steps.is_empty(), "{} has steps", name);
        scenario.validate().unwrap();
    }
}

#[test]
fn en_and_et_flows_are_structurally_identical() {
    let en = load("admin_index_en.yaml");
    let et = load("admin_index_et.yaml");

    // The pair differs only in locale and login identity, never in the
    // sequence of actions.
    assert_eq!(en.steps.len(), et.steps.len());
    for (a, b) in en.steps.iter().zip(et.steps.iter()) {
        assert_eq!(kind(a), kind(b));
    }

    // Same navigation gating in both
    let gated = |s: &Scenario| {
        s.steps
            .iter()
            .filter(|s| matches!(s, Step::Click { navigates: true, .. }))
            .count()
    };
    assert_eq!(gated(&en), gated(&et));
}

#[test]
fn en_flow_asserts_the_recorded_urls() {
    let en = load("admin_index_en.yaml");

    let asserted: Vec<String> = en
        .steps
        .iter()
        .filter_map(|s| match s {
            Step::AssertUrl { url } => Some(en.resolve_url(url).unwrap()),
            _ => None,
        })
        .collect();

    // Each created record lands on its literal identifier URL, and both
    // deletes return to the listing.
    assert!(asserted.contains(&"http://localhost:4000/#/admin/index/87960930223112".to_string()));
    assert!(asserted.contains(&"http://localhost:4000/#/admin/index/74766790689801".to_string()));
    assert_eq!(
        asserted.last().unwrap(),
        "http://localhost:4000/#/admin/indexes"
    );
    assert_eq!(
        asserted
            .iter()
            .filter(|u| u.ends_with("/#/admin/indexes"))
            .count(),
        3,
        "post-login listing plus one per delete"
    );
}

#[test]
fn navigation_gated_steps_cover_login_and_confirmations() {
    let en = load("admin_index_en.yaml");

    let gated: Vec<&str> = en
        .steps
        .iter()
        .filter_map(|s| match s {
            Step::Click {
                selector,
                navigates: true,
            } => Some(selector.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(gated.len(), 4);
    assert!(gated[0].contains("Login as Benjamin Boss"));
    assert!(gated[1].contains("Add new index"));
    assert_eq!(gated[2], "#confirmation-confirm");
    assert_eq!(gated[3], "#confirmation-confirm");
}

#[test]
fn filled_text_is_literal() {
    let en = load("admin_index_en.yaml");

    let filled: Vec<&str> = en
        .steps
        .iter()
        .filter_map(|s| match s {
            Step::Fill { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    // Fill round-trips the exact text: the later listing clicks address
    // the records by these literals.
    assert!(filled.contains(&"my lovely index"));
    assert!(filled.contains(&"my fantastic index"));
    assert!(filled.contains(&"your lovely index"));
    for text in ["my lovely index", "my fantastic index", "your lovely index"] {
        assert!(
            en.steps.iter().any(|s| matches!(
                s,
                Step::Click { selector, .. } if selector == &format!("text={}", text)
            ) || matches!(
                s,
                Step::Fill { text: t, .. } if t == text
            )),
            "{} appears in the flow",
            text
        );
    }
}

#[test]
fn every_selector_in_shipped_scenarios_parses() {
    for name in ["admin_index_en.yaml", "admin_index_et.yaml"] {
        let scenario = load(name);
        for step in &scenario.steps {
            let selector = match step {
                Step::Click { selector, .. }
                | Step::Fill { selector, .. }
                | Step::SelectOption { selector, .. }
                | Step::Press { selector, .. } => selector,
                _ => continue,
            };
            Selector::parse(selector).unwrap();
        }
    }
}

#[test]
fn press_home_precedes_the_rename() {
    let en = load("admin_index_en.yaml");

    let press_idx = en
        .steps
        .iter()
        .position(|s| matches!(s, Step::Press { key, .. } if key == "Home"))
        .expect("recorded flow presses Home before refilling the name");
    let rename_idx = en
        .steps
        .iter()
        .position(|s| matches!(s, Step::Fill { text, .. } if text == "your lovely index"))
        .unwrap();
    assert!(press_idx < rename_idx);
}
