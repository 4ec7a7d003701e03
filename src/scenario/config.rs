//! Scenario configuration types
//!
//! Defines the data structures for deserializing YAML scenario files.
//! A scenario is a literal, ordered list of UI steps; sequence order is
//! the entire control flow.

use serde::Deserialize;

use crate::browser::Selector;
use crate::common::{Error, Result};

/// A complete scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Base URL prefixed to relative `goto` and `assert_url` values
    pub base_url: Option<String>,
    /// The ordered steps to execute
    pub steps: Vec<Step>,
}

/// A single step in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate the page to a URL
    Goto {
        /// Target URL, absolute or relative to `base_url`
        url: String,
    },
    /// Click the single element the selector resolves to
    Click {
        /// Selector expression (css, `text=`, or `:has-text(...)`)
        selector: String,
        /// Navigation-gated: wait for the triggered page load to settle
        /// before the next step runs
        #[serde(default)]
        navigates: bool,
    },
    /// Clear an editable field and type text into it
    Fill {
        selector: String,
        /// Literal text; the field holds exactly this value afterwards
        text: String,
    },
    /// Set a `<select>` control by option value
    SelectOption {
        selector: String,
        value: String,
    },
    /// Send a single keyboard key event to the target element
    Press {
        selector: String,
        /// Key name, e.g. "Home", "Enter", "Escape"
        key: String,
    },
    /// Block until the current navigation settles
    WaitForNavigation {
        /// Override the default navigation timeout
        timeout_secs: Option<u64>,
    },
    /// Compare the current page URL to a literal; mismatch fails the run
    AssertUrl {
        url: String,
    },
}

impl Scenario {
    /// Check the scenario without a browser: step shape, selector syntax,
    /// and URL form. `uitest check` runs exactly this.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("scenario name is empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(Error::Config(format!(
                "scenario '{}' has no steps",
                self.name
            )));
        }

        for (i, step) in self.steps.iter().enumerate() {
            let step_num = i + 1;
            match step {
                Step::Goto { url } | Step::AssertUrl { url } => {
                    self.resolve_url(url).map_err(|e| {
                        Error::Config(format!("step {}: {}", step_num, e))
                    })?;
                }
                Step::Click { selector, .. }
                | Step::Fill { selector, .. }
                | Step::SelectOption { selector, .. }
                | Step::Press { selector, .. } => {
                    Selector::parse(selector).map_err(|e| {
                        Error::Config(format!("step {}: {}", step_num, e))
                    })?;
                }
                Step::WaitForNavigation { .. } => {}
            }
        }
        Ok(())
    }

    /// Resolve a step URL against `base_url`
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            )),
            None => Err(Error::Config(format!(
                "relative URL '{}' needs a base_url",
                url
            ))),
        }
    }
}

impl Step {
    /// One-line description for runner output
    pub fn describe(&self) -> String {
        match self {
            Step::Goto { url } => format!("goto {}", url),
            Step::Click {
                selector,
                navigates: false,
            } => format!("click {}", selector),
            Step::Click {
                selector,
                navigates: true,
            } => format!("click {} (navigates)", selector),
            Step::Fill { selector, text } => format!("fill {} = {:?}", selector, text),
            Step::SelectOption { selector, value } => {
                format!("select {} = {}", selector, value)
            }
            Step::Press { selector, key } => format!("press {} on {}", key, selector),
            Step::WaitForNavigation { .. } => "wait for navigation".to_string(),
            Step::AssertUrl { url } => format!("assert url == {}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Scenario {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_all_step_kinds() {
        let scenario = parse(
            r##"
name: kitchen sink
base_url: "http://localhost:4000"
steps:
  - action: goto
    url: "#/login"
  - action: fill
    selector: "#password-textfield"
    text: beetrootred
  - action: click
    selector: "button:has-text(\"Login\")"
    navigates: true
  - action: select_option
    selector: select
    value: "2"
  - action: press
    selector: "form input"
    key: Home
  - action: wait_for_navigation
    timeout_secs: 5
  - action: assert_url
    url: "#/admin/indexes"
"##,
        );

        assert_eq!(scenario.steps.len(), 7);
        assert!(matches!(scenario.steps[0], Step::Goto { .. }));
        assert!(matches!(
            scenario.steps[2],
            Step::Click { navigates: true, .. }
        ));
        assert!(matches!(
            scenario.steps[5],
            Step::WaitForNavigation {
                timeout_secs: Some(5)
            }
        ));
        scenario.validate().unwrap();
    }

    #[test]
    fn test_click_navigates_defaults_to_false() {
        let scenario = parse(
            r##"
name: plain click
steps:
  - action: click
    selector: "#EN"
"##,
        );
        assert!(matches!(
            scenario.steps[0],
            Step::Click {
                navigates: false,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: std::result::Result<Scenario, _> = serde_yaml::from_str(
            r##"
name: bad
steps:
  - action: hover
    selector: "#EN"
"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let scenario = parse(
            r#"
name: bad selector
steps:
  - action: click
    selector: "button:has-text(Save)"
"#,
        );
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn test_validate_rejects_empty_steps() {
        let scenario = parse("name: empty\nsteps: []\n");
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_resolve_url() {
        let scenario = parse(
            r##"
name: urls
base_url: "http://localhost:4000/"
steps:
  - action: goto
    url: "#/admin/indexes"
"##,
        );
        assert_eq!(
            scenario.resolve_url("#/admin/indexes").unwrap(),
            "http://localhost:4000/#/admin/indexes"
        );
        assert_eq!(
            scenario.resolve_url("https://example.com/x").unwrap(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_resolve_relative_url_without_base_fails() {
        let scenario = parse(
            r##"
name: no base
steps:
  - action: goto
    url: "#/login"
"##,
        );
        assert!(scenario.resolve_url("#/login").is_err());
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_describe() {
        let step = Step::Click {
            selector: "button:has-text(\"Save\")".to_string(),
            navigates: true,
        };
        assert_eq!(step.describe(), "click button:has-text(\"Save\") (navigates)");
    }
}
