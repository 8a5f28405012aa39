//! The cucumber world: one scenario context per scenario, plus the shared
//! run report the after-hook records into.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use cucumber::event::{ScenarioFinished, StepError};
use cucumber::gherkin;
use once_cell::sync::{Lazy, OnceCell};

use comprar::{
    ComprarResult, RunReport, ScenarioContext, ScenarioRecord, ScenarioStatus, SessionFactory,
    Settings, StepRecord,
};

/// Marker carried in pending-step panics; the after-hook maps it to the
/// pending outcome.
const PENDING_MARKER: &str = "step not yet implemented";

static SETTINGS: OnceCell<Arc<Settings>> = OnceCell::new();
static REPORT: Lazy<Mutex<RunReport>> =
    Lazy::new(|| Mutex::new(RunReport::new("Storefront Automation Report")));

/// Publish the loaded settings before the run starts. First call wins.
pub fn publish_settings(settings: Settings) {
    let title = settings.report_title().to_string();
    if SETTINGS.set(Arc::new(settings)).is_ok() {
        if let Ok(mut report) = REPORT.lock() {
            report.title = title;
        }
    }
}

/// The run's settings (defaults if none were published).
pub fn settings() -> Arc<Settings> {
    Arc::clone(SETTINGS.get_or_init(|| Arc::new(Settings::defaults())))
}

/// Take the accumulated run report, leaving an empty one behind.
pub fn take_report() -> RunReport {
    let title = settings().report_title().to_string();
    match REPORT.lock() {
        Ok(mut report) => std::mem::replace(&mut *report, RunReport::new(title)),
        Err(_) => RunReport::new(title),
    }
}

/// Per-scenario world: the session and page objects shared by its steps.
#[derive(cucumber::World, Debug)]
#[world(init = Self::boot)]
pub struct StorefrontWorld {
    ctx: ScenarioContext,
    started: Instant,
}

impl StorefrontWorld {
    async fn boot() -> ComprarResult<Self> {
        let settings = settings();
        let factory = SessionFactory::from_settings(&settings);
        let ctx = comprar::before_scenario(settings, &factory, "scenario").await?;
        Ok(Self {
            ctx,
            started: Instant::now(),
        })
    }

    /// The scenario's shared context.
    #[must_use]
    pub const fn ctx(&self) -> &ScenarioContext {
        &self.ctx
    }
}

/// Signal a step whose behavior has not been built yet. The scenario is
/// reported as pending, distinct from both pass and fail.
pub fn pending(step: &str) -> ! {
    panic!("{PENDING_MARKER}: {step}")
}

fn panic_message(info: &(dyn std::any::Any + Send)) -> String {
    info.downcast_ref::<String>().cloned().map_or_else(
        || {
            info.downcast_ref::<&str>()
                .map_or_else(|| "unknown failure".to_string(), |s| (*s).to_string())
        },
        |s| s,
    )
}

/// After-hook body: derive the scenario outcome, run teardown, record the
/// result into the shared report.
pub async fn record_outcome(
    feature: String,
    scenario: &gherkin::Scenario,
    ev: &ScenarioFinished,
    world: Option<&mut StorefrontWorld>,
) {
    let (status, error) = match ev {
        ScenarioFinished::StepPassed => (ScenarioStatus::Passed, None),
        ScenarioFinished::StepSkipped => (ScenarioStatus::Skipped, None),
        ScenarioFinished::StepFailed(_, _, err) => {
            let message = match err {
                StepError::Panic(info) => panic_message(info.as_ref()),
                other => other.to_string(),
            };
            if message.contains(PENDING_MARKER) {
                (ScenarioStatus::Pending, Some(message))
            } else {
                (ScenarioStatus::Failed, Some(message))
            }
        }
        ScenarioFinished::BeforeHookFailed(info) => {
            (ScenarioStatus::Failed, Some(panic_message(info.as_ref())))
        }
    };

    let mut record = ScenarioRecord::new(feature, scenario.name.clone(), status);
    if let Some(message) = error {
        record = record.with_error(message);
    }

    // Per-step outcomes are only fully known for passing scenarios; a
    // failed scenario carries its violation at scenario level instead.
    if status == ScenarioStatus::Passed {
        for step in &scenario.steps {
            record = record.with_step(StepRecord::passed(format!(
                "{} {}",
                step.keyword.trim(),
                step.value
            )));
        }
    }

    if let Some(world) = world {
        let diagnostics =
            comprar::after_scenario(&world.ctx, &scenario.name, status.is_failed()).await;
        record = record
            .with_duration(world.started.elapsed())
            .with_diagnostics(diagnostics.screenshot, diagnostics.url, diagnostics.title);
    }

    if let Ok(mut report) = REPORT.lock() {
        report.record(record);
    }
}
