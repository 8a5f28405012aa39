//! On-failure screenshot capture.
//!
//! Capture is a fire-and-forget diagnostic side effect: its own failure is
//! logged and must never mask the error that triggered it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::Backend;
use crate::config::Settings;

/// Filename timestamp format, e.g. `20260808_142501`.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes failure screenshots into the configured directory.
#[derive(Debug, Clone)]
pub struct ScreenshotSink {
    enabled: bool,
    dir: PathBuf,
}

impl ScreenshotSink {
    /// Sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            dir: dir.into(),
        }
    }

    /// Sink configured from suite settings (`screenshot_on_failure`,
    /// `screenshot_dir`).
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.screenshot_on_failure(),
            dir: PathBuf::from(settings.screenshot_dir()),
        }
    }

    /// A sink that never captures.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::new(),
        }
    }

    /// Whether capture is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture a screenshot named `{source}_{reason}_{timestamp}.png`.
    ///
    /// Best-effort: any failure is logged and `None` is returned, so the
    /// caller's original error is never masked.
    pub async fn capture(
        &self,
        backend: &Arc<dyn Backend>,
        source: &str,
        reason: &str,
    ) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let data = match backend.screenshot().await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => {
                tracing::warn!(source, reason, "screenshot capture returned no data");
                return None;
            }
            Err(e) => {
                tracing::warn!(source, reason, error = %e, "screenshot capture failed");
                return None;
            }
        };

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "cannot create screenshot dir");
            return None;
        }

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let filename = format!("{source}_{reason}_{timestamp}.png");
        let path = self.dir.join(filename);

        match std::fs::write(&path, data) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "screenshot saved");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot write screenshot");
                None
            }
        }
    }
}
