//! Scenario runner implementation
//!
//! Executes the ordered steps of a scenario against one browser session.
//! Any step failure aborts the remaining sequence; teardown runs on both
//! the success and the failure path.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use tracing::warn;

use crate::browser::{Selector, Session, SessionConfig};
use crate::common::{Error, Result};

use super::config::{Scenario, Step};

/// Result of a scenario run
#[derive(Debug)]
pub struct RunResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

impl RunResult {
    /// Convert a failed run into the error that drives the exit status,
    /// carrying the failing step's message
    pub fn failure(self) -> Option<Error> {
        if self.passed {
            return None;
        }
        Some(Error::ScenarioFailed {
            name: self.name,
            step: self.steps_run,
            message: self.error.unwrap_or_default(),
        })
    }
}

/// Runner options from the CLI
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Launch a visible browser window
    pub headed: bool,
    /// Print the page URL after every step
    pub verbose: bool,
    /// Override the per-action selector wait budget
    pub action_timeout_secs: Option<u64>,
}

/// Load and validate a scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    let scenario: Scenario = serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse scenario: {}", e)))?;

    scenario.validate()?;
    Ok(scenario)
}

/// Run a scenario from a YAML file
pub async fn run_scenario(path: &Path, options: &RunOptions) -> Result<RunResult> {
    let scenario = load_scenario(path)?;
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let mut session_config = SessionConfig {
        headless: !options.headed,
        ..SessionConfig::default()
    };
    if let Some(secs) = options.action_timeout_secs {
        session_config.action_timeout = Duration::from_secs(secs);
    }

    let session = Session::launch(session_config).await?;

    println!("\n{}", "Steps:".cyan());

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        match execute_step(&session, &scenario, step, step_num, options.verbose).await {
            Ok(()) => {
                // Step passed
            }
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, e);

                // Teardown still runs after a failed step
                if let Err(close_err) = session.close().await {
                    warn!("teardown after failed step: {}", close_err);
                }

                return Ok(RunResult {
                    name: scenario.name.clone(),
                    passed: false,
                    steps_run: step_num,
                    steps_total,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    session.close().await?;

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        "Scenario Passed".green().bold()
    );

    Ok(RunResult {
        name: scenario.name,
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

/// Execute a single step
async fn execute_step(
    session: &Session,
    scenario: &Scenario,
    step: &Step,
    step_num: usize,
    verbose: bool,
) -> Result<()> {
    match step {
        Step::Goto { url } => {
            session.goto(&scenario.resolve_url(url)?).await?;
        }
        Step::Click {
            selector,
            navigates,
        } => {
            let selector = Selector::parse(selector)?;
            session.click(&selector).await?;
            if *navigates {
                session.wait_for_navigation(None).await?;
            }
        }
        Step::Fill { selector, text } => {
            session.fill(&Selector::parse(selector)?, text).await?;
        }
        Step::SelectOption { selector, value } => {
            session
                .select_option(&Selector::parse(selector)?, value)
                .await?;
        }
        Step::Press { selector, key } => {
            session.press(&Selector::parse(selector)?, key).await?;
        }
        Step::WaitForNavigation { timeout_secs } => {
            session
                .wait_for_navigation(timeout_secs.map(Duration::from_secs))
                .await?;
        }
        Step::AssertUrl { url } => {
            let expected = scenario.resolve_url(url)?;
            let actual = session.current_url().await?;
            if actual != expected {
                return Err(Error::url_mismatch(&expected, &actual));
            }
        }
    }

    println!(
        "  {} Step {}: {}",
        "✓".green(),
        step_num,
        step.describe().dimmed()
    );

    if verbose {
        let url = session.current_url().await.unwrap_or_default();
        println!("      {}", url.dimmed());
    }

    Ok(())
}
