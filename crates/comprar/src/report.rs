//! Run reporting.
//!
//! Collects per-scenario results (including the distinguished pending
//! outcome for unimplemented steps) and renders them as a machine-readable
//! JSON report plus a human-readable HTML report. The run's exit status is
//! derived from [`RunReport::all_passed`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::result::ComprarResult;

/// Outcome of one scenario or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Every step passed
    Passed,
    /// A step failed
    Failed,
    /// A step's behavior has not been built yet
    Pending,
    /// Skipped (an earlier step failed or was pending)
    Skipped,
}

impl ScenarioStatus {
    /// Whether this outcome counts against the run's exit status.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    const fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::Pending => "pending",
            Self::Skipped => "skip",
        }
    }
}

/// One executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step phrase as written in the scenario
    pub text: String,
    /// Step outcome
    pub status: ScenarioStatus,
    /// Error message if the step failed
    pub error: Option<String>,
}

impl StepRecord {
    /// A passed step.
    #[must_use]
    pub fn passed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: ScenarioStatus::Passed,
            error: None,
        }
    }

    /// A failed step.
    #[must_use]
    pub fn failed(text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: ScenarioStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// One executed scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario name
    pub name: String,
    /// Feature the scenario belongs to
    pub feature: String,
    /// Scenario outcome
    pub status: ScenarioStatus,
    /// Wall-clock duration
    pub duration: Duration,
    /// The failing contract violation, verbatim
    pub error: Option<String>,
    /// Failure screenshot path
    pub screenshot: Option<PathBuf>,
    /// Page URL at time of failure
    pub url: Option<String>,
    /// Page title at time of failure
    pub title: Option<String>,
    /// Executed steps
    pub steps: Vec<StepRecord>,
}

impl ScenarioRecord {
    /// A record with the given outcome and no diagnostics.
    #[must_use]
    pub fn new(
        feature: impl Into<String>,
        name: impl Into<String>,
        status: ScenarioStatus,
    ) -> Self {
        Self {
            name: name.into(),
            feature: feature.into(),
            status,
            duration: Duration::ZERO,
            error: None,
            screenshot: None,
            url: None,
            title: None,
            steps: Vec::new(),
        }
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the failure error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach failure diagnostics.
    #[must_use]
    pub fn with_diagnostics(
        mut self,
        screenshot: Option<PathBuf>,
        url: Option<String>,
        title: Option<String>,
    ) -> Self {
        self.screenshot = screenshot;
        self.url = url;
        self.title = title;
        self
    }

    /// Append a step record.
    #[must_use]
    pub fn with_step(mut self, step: StepRecord) -> Self {
        self.steps.push(step);
        self
    }
}

/// Aggregated results of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report title
    pub title: String,
    /// Run start, wall-clock
    pub started_at: String,
    /// Scenario results, in completion order
    pub scenarios: Vec<ScenarioRecord>,
}

impl RunReport {
    /// Empty report stamped with the current time.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            started_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            scenarios: Vec::new(),
        }
    }

    /// Record a scenario result.
    pub fn record(&mut self, scenario: ScenarioRecord) {
        self.scenarios.push(scenario);
    }

    /// Number of scenarios with the given status.
    #[must_use]
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }

    /// Number of passed scenarios.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of pending scenarios.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.count(ScenarioStatus::Pending)
    }

    /// Total number of scenarios.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether no scenario failed. Pending scenarios do not fail the run;
    /// they are reported as missing coverage.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Pass rate in `[0.0, 1.0]`.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.scenarios.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.scenarios.len() as f64
    }

    /// Total wall-clock spent in scenarios.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.scenarios.iter().map(|s| s.duration).sum()
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed, {} failed, {} pending ({:.1}%)",
            self.title,
            self.passed_count(),
            self.total_count(),
            self.failed_count(),
            self.pending_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ComprarResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `report.json` and `report.html` into `dir`, returning their
    /// paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file
    /// cannot be written.
    pub fn write_to(&self, dir: &Path) -> ComprarResult<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let json_path = dir.join("report.json");
        let html_path = dir.join("report.html");
        std::fs::write(&json_path, self.to_json()?)?;
        std::fs::write(&html_path, self.render_html())?;
        tracing::info!(
            json = %json_path.display(),
            html = %html_path.display(),
            "reports written"
        );
        Ok((json_path, html_path))
    }

    /// Render the HTML report.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Storefront Test Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .progress-bar { background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }
        .passed { background: #4caf50; height: 100%; }
        .scenario { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .scenario.pass { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .scenario.fail { background: #ffebee; border-left: 4px solid #f44336; }
        .scenario.pending { background: #e3f2fd; border-left: 4px solid #2196f3; }
        .scenario.skip { background: #fff3e0; border-left: 4px solid #ff9800; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        .diagnostics { color: #555; font-size: 0.9em; }
        .step { margin-left: 20px; font-size: 0.95em; }
    </style>
</head>
<body>
"#,
        );

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {}/{} passed, {} failed, {} pending</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Started: {} &middot; Duration: {:.2}s</p>
</div>
"#,
            self.title,
            self.passed_count(),
            self.total_count(),
            self.failed_count(),
            self.pending_count(),
            self.pass_rate() * 100.0,
            self.started_at,
            self.total_duration().as_secs_f64()
        ));

        html.push_str("<h2>Scenarios</h2>\n");
        for scenario in &self.scenarios {
            html.push_str(&format!(
                r#"<div class="scenario {}">
    <strong>{}</strong> &mdash; {} &mdash; {:?} ({:.2}s)
"#,
                scenario.status.css_class(),
                scenario.name,
                scenario.feature,
                scenario.status,
                scenario.duration.as_secs_f64()
            ));

            for step in &scenario.steps {
                html.push_str(&format!(
                    "    <div class=\"step\">{:?}: {}</div>\n",
                    step.status, step.text
                ));
            }

            if let Some(error) = &scenario.error {
                html.push_str(&format!("    <div class=\"error\">{error}</div>\n"));
            }
            if scenario.screenshot.is_some() || scenario.url.is_some() {
                html.push_str(&format!(
                    "    <div class=\"diagnostics\">screenshot: {} &middot; url: {} &middot; title: {}</div>\n",
                    scenario
                        .screenshot
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
                    scenario.url.as_deref().unwrap_or("-"),
                    scenario.title.as_deref().unwrap_or("-")
                ));
            }

            html.push_str("</div>\n");
        }

        html.push_str(
            r"
<footer>
    <p>Generated by Comprar</p>
</footer>
</body>
</html>
",
        );

        html
    }
}
