//! Scenario lifecycle hooks.
//!
//! Setup acquires a fresh session, navigates to the application and clears
//! any stray native dialog (a credential-manager prompt would block every
//! later interaction). Teardown captures failure diagnostics best-effort
//! and releases the session unconditionally: a scenario can fail, its
//! teardown must not.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::context::ScenarioContext;
use crate::result::ComprarResult;
use crate::session::SessionFactory;

/// Diagnostics collected when a scenario fails.
#[derive(Debug, Clone, Default)]
pub struct FailureDiagnostics {
    /// Path of the captured screenshot, if capture succeeded
    pub screenshot: Option<PathBuf>,
    /// Page URL at time of failure
    pub url: Option<String>,
    /// Page title at time of failure
    pub title: Option<String>,
}

/// Filesystem-safe rendering of a scenario name for screenshot filenames.
#[must_use]
pub fn sanitize_scenario_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Per-scenario setup: launch a session, open the application, dismiss any
/// unexpected native dialog.
///
/// # Errors
///
/// Returns an error if the session cannot be launched or the initial
/// navigation fails; the session is closed before returning in the latter
/// case.
pub async fn before_scenario(
    settings: Arc<Settings>,
    factory: &SessionFactory,
    scenario: &str,
) -> ComprarResult<ScenarioContext> {
    tracing::info!(scenario, "starting scenario");

    let session = factory.launch().await?;
    let ctx = ScenarioContext::new(session, settings);

    let backend = ctx.session().backend();
    if let Err(e) = backend.navigate(ctx.settings().base_url()).await {
        let _ = ctx.session().close().await;
        return Err(e);
    }

    match backend.dismiss_dialog().await {
        Ok(true) => tracing::info!("dismissed unexpected native dialog"),
        Ok(false) => {}
        Err(e) => tracing::debug!(error = %e, "dialog probe failed"),
    }

    tracing::info!(scenario, "session ready");
    Ok(ctx)
}

/// Per-scenario teardown: capture diagnostics if the scenario failed, then
/// release the session. Never fails.
pub async fn after_scenario(
    ctx: &ScenarioContext,
    scenario: &str,
    failed: bool,
) -> FailureDiagnostics {
    let mut diagnostics = FailureDiagnostics::default();

    if failed {
        tracing::error!(scenario, "scenario failed");
        let backend = ctx.session().backend();

        diagnostics.screenshot = ctx
            .sink()
            .capture(&backend, &sanitize_scenario_name(scenario), "scenario_failed")
            .await;

        diagnostics.url = backend.current_url().await.ok();
        diagnostics.title = backend.title().await.ok();
        tracing::error!(
            scenario,
            url = diagnostics.url.as_deref().unwrap_or("<unavailable>"),
            title = diagnostics.title.as_deref().unwrap_or("<unavailable>"),
            "failure diagnostics"
        );
    } else {
        tracing::info!(scenario, "scenario passed");
    }

    if let Err(e) = ctx.session().close().await {
        tracing::warn!(scenario, error = %e, "session close failed");
    }
    tracing::info!(scenario, "teardown complete");

    diagnostics
}
