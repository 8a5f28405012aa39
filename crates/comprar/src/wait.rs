//! The synchronization layer: explicit waits and interaction primitives.
//!
//! Every page interaction goes through [`Interactor`], which blocks (with a
//! bounded timeout) until a readiness condition holds before acting. The
//! locator is re-resolved against the live page on every poll; a prior
//! wait is never assumed to still be valid, because element references go
//! stale on any navigation or DOM mutation.
//!
//! Two families of primitives:
//!
//! - **Waits** (`wait_*`): block until a condition holds or fail with the
//!   condition-specific timeout error carrying the locator and timeout.
//! - **Probes** (`probe_*`, `visible_count`): status-returning variants for
//!   the "is X on screen" query case, where absence is an ordinary outcome
//!   rather than a caught fault.
//!
//! Action compositions (`click`, `type_text`, ...) first resolve readiness
//! (clickable for clicks, visible for everything else), then act.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::backend::{Backend, ElementSnapshot, OptionChoice};
use crate::config::Settings;
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for explicit waits (matches the `explicit_wait_secs`
/// configuration default)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(20);

/// Polling interval between condition checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Script expression for the document-ready flag
const DOCUMENT_READY: &str = "document.readyState === 'complete'";

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Timeout and cadence for wait operations.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout before a wait fails
    pub timeout: Duration,
    /// Interval between condition checks
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    /// New options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// =============================================================================
// INTERACTOR
// =============================================================================

/// The interactable-session capability page objects are built on.
///
/// Holds the session's [`Backend`] and the configured default timeouts.
/// Cloning is cheap and shares the same session.
#[derive(Clone)]
pub struct Interactor {
    backend: Arc<dyn Backend>,
    options: WaitOptions,
    page_load_timeout: Duration,
}

impl std::fmt::Debug for Interactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Interactor {
    /// Interactor with default timeouts.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            options: WaitOptions::default(),
            page_load_timeout: Duration::from_secs(30),
        }
    }

    /// Interactor with timeouts taken from suite settings
    /// (`explicit_wait_secs`, `page_load_timeout_secs`).
    #[must_use]
    pub fn from_settings(backend: Arc<dyn Backend>, settings: &Settings) -> Self {
        Self {
            backend,
            options: WaitOptions::new().with_timeout(settings.explicit_wait()),
            page_load_timeout: settings.page_load_timeout(),
        }
    }

    /// Interactor with explicit wait options.
    #[must_use]
    pub fn with_options(backend: Arc<dyn Backend>, options: WaitOptions) -> Self {
        Self {
            backend,
            options,
            page_load_timeout: Duration::from_secs(30),
        }
    }

    /// The underlying driving capability.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// The configured default wait options.
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.options.timeout)
    }

    // =========================================================================
    // Wait conditions
    // =========================================================================

    /// Wait until at least one element matching the locator is rendered and
    /// visible, returning its snapshot.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ElementNotVisible`] on timeout; backend faults
    /// propagate unchanged.
    pub async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<ElementSnapshot> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            if let Some(snapshot) = snapshots.into_iter().find(|s| s.visible) {
                tracing::debug!(%locator, "element visible");
                return Ok(snapshot);
            }
            if start.elapsed() >= timeout {
                tracing::debug!(%locator, ?timeout, "element not visible within timeout");
                return Err(ComprarError::ElementNotVisible {
                    locator: locator.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Wait until a matching element is visible, enabled and therefore
    /// clickable, returning its snapshot.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ElementNotClickable`] on timeout.
    pub async fn wait_clickable(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<ElementSnapshot> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            if let Some(snapshot) = snapshots.into_iter().find(ElementSnapshot::clickable) {
                tracing::debug!(%locator, "element clickable");
                return Ok(snapshot);
            }
            if start.elapsed() >= timeout {
                tracing::warn!(%locator, ?timeout, "element not clickable within timeout");
                return Err(ComprarError::ElementNotClickable {
                    locator: locator.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Wait until a matching element exists in the document, visible or not.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ElementNotPresent`] on timeout.
    pub async fn wait_present(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<ElementSnapshot> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let mut snapshots = self.backend.query(locator).await?;
            if !snapshots.is_empty() {
                tracing::debug!(%locator, "element present");
                return Ok(snapshots.remove(0));
            }
            if start.elapsed() >= timeout {
                tracing::warn!(%locator, ?timeout, "element not present within timeout");
                return Err(ComprarError::ElementNotPresent {
                    locator: locator.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Wait until every currently matching element is visible, returning
    /// all their snapshots.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ElementNotVisible`] on timeout.
    pub async fn wait_all_visible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<Vec<ElementSnapshot>> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            if !snapshots.is_empty() && snapshots.iter().all(|s| s.visible) {
                tracing::debug!(%locator, count = snapshots.len(), "all elements visible");
                return Ok(snapshots);
            }
            if start.elapsed() >= timeout {
                tracing::warn!(%locator, ?timeout, "elements not all visible within timeout");
                return Err(ComprarError::ElementNotVisible {
                    locator: locator.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Wait until no matching element exists, or none of the matches is
    /// visible.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ConditionTimeout`] on timeout.
    pub async fn wait_invisible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<bool> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            if snapshots.iter().all(|s| !s.visible) {
                tracing::debug!(%locator, "element invisible");
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                tracing::warn!(%locator, ?timeout, "element still visible after timeout");
                return Err(ComprarError::ConditionTimeout {
                    condition: format!("{locator} invisible"),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Generic escape hatch: poll a custom condition until it yields a
    /// value.
    ///
    /// The condition owns its captures (clone the backend handle in); it is
    /// re-evaluated every poll interval.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ConditionTimeout`] on timeout; condition errors
    /// propagate unchanged.
    pub async fn wait_for<T, F, Fut>(
        &self,
        description: &str,
        timeout: Option<Duration>,
        mut condition: F,
    ) -> ComprarResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ComprarResult<Option<T>>>,
    {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            if let Some(value) = condition().await? {
                tracing::debug!(condition = description, "condition met");
                return Ok(value);
            }
            if start.elapsed() >= timeout {
                tracing::warn!(condition = description, ?timeout, "condition not met");
                return Err(ComprarError::ConditionTimeout {
                    condition: description.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Wait for the in-page readiness flag (`document.readyState`).
    ///
    /// Single-page-app navigations do not reliably fire full reloads, so
    /// page objects pair this with a key element's visibility.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ConditionTimeout`] on timeout.
    pub async fn wait_for_document_ready(&self) -> ComprarResult<()> {
        let backend = Arc::clone(&self.backend);
        self.wait_for("document ready", Some(self.page_load_timeout), move || {
            let backend = Arc::clone(&backend);
            async move { Ok(backend.eval_bool(DOCUMENT_READY).await?.then_some(())) }
        })
        .await
    }

    /// Wait until the page title contains `text`.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ConditionTimeout`] on timeout.
    pub async fn wait_title_contains(
        &self,
        text: &str,
        timeout: Option<Duration>,
    ) -> ComprarResult<bool> {
        let backend = Arc::clone(&self.backend);
        let needle = text.to_string();
        self.wait_for(&format!("title contains '{text}'"), timeout, move || {
            let backend = Arc::clone(&backend);
            let needle = needle.clone();
            async move { Ok(backend.title().await?.contains(&needle).then_some(true)) }
        })
        .await
    }

    /// Wait until the page URL contains `text`.
    ///
    /// # Errors
    ///
    /// [`ComprarError::ConditionTimeout`] on timeout.
    pub async fn wait_url_contains(
        &self,
        text: &str,
        timeout: Option<Duration>,
    ) -> ComprarResult<bool> {
        let backend = Arc::clone(&self.backend);
        let needle = text.to_string();
        self.wait_for(&format!("url contains '{text}'"), timeout, move || {
            let backend = Arc::clone(&backend);
            let needle = needle.clone();
            async move { Ok(backend.current_url().await?.contains(&needle).then_some(true)) }
        })
        .await
    }

    // =========================================================================
    // Probes: absence is an ordinary result, not a fault
    // =========================================================================

    /// Poll for a visible match; `None` on timeout instead of an error.
    ///
    /// # Errors
    ///
    /// Only backend faults (the session dying mid-query) propagate.
    pub async fn probe_visible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<Option<ElementSnapshot>> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            if let Some(snapshot) = snapshots.into_iter().find(|s| s.visible) {
                return Ok(Some(snapshot));
            }
            if start.elapsed() >= timeout {
                return Ok(None);
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Poll until at least one match is visible, then return all visible
    /// matches; empty on timeout instead of an error.
    ///
    /// # Errors
    ///
    /// Only backend faults propagate.
    pub async fn probe_all_visible(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> ComprarResult<Vec<ElementSnapshot>> {
        let timeout = self.timeout_or_default(timeout);
        let start = Instant::now();
        loop {
            let snapshots = self.backend.query(locator).await?;
            let visible: Vec<ElementSnapshot> =
                snapshots.into_iter().filter(|s| s.visible).collect();
            if !visible.is_empty() {
                return Ok(visible);
            }
            if start.elapsed() >= timeout {
                return Ok(vec![]);
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Number of currently visible matches, without waiting.
    ///
    /// # Errors
    ///
    /// Only backend faults propagate.
    pub async fn visible_count(&self, locator: &Locator) -> ComprarResult<usize> {
        let snapshots = self.backend.query(locator).await?;
        Ok(snapshots.iter().filter(|s| s.visible).count())
    }

    // =========================================================================
    // Action compositions: readiness first, then act
    // =========================================================================

    /// Wait clickable, then click.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn click(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_clickable(locator, None).await?;
        self.backend.click(locator).await?;
        tracing::debug!(%locator, "clicked");
        Ok(())
    }

    /// Wait visible, then click from script, bypassing hit-testing.
    ///
    /// For elements that are visible but layered beneath another element
    /// for ordinary hit-testing.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn click_via_script(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend.click_via_script(locator).await?;
        tracing::debug!(%locator, "clicked via script");
        Ok(())
    }

    /// Wait visible, clear existing content, then enter `text`.
    ///
    /// Replaces prior content: typing "abc" into a field holding "xyz"
    /// leaves exactly "abc".
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend.clear_and_type(locator, text).await?;
        tracing::debug!(%locator, "typed text");
        Ok(())
    }

    /// Wait visible, then read the element's text content.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn read_text(&self, locator: &Locator) -> ComprarResult<String> {
        let snapshot = self.wait_visible(locator, None).await?;
        Ok(snapshot.text)
    }

    /// Wait visible, then read an attribute value.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn read_attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> ComprarResult<Option<String>> {
        let snapshot = self.wait_visible(locator, None).await?;
        Ok(snapshot.attribute(name).map(String::from))
    }

    /// Wait visible, then select an option by its visible label.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn select_by_label(&self, locator: &Locator, label: &str) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend
            .select_option(locator, &OptionChoice::Label(label.to_string()))
            .await
    }

    /// Wait visible, then select an option by value.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn select_by_value(&self, locator: &Locator, value: &str) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend
            .select_option(locator, &OptionChoice::Value(value.to_string()))
            .await
    }

    /// Wait visible, then select an option by 0-based index.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn select_by_index(&self, locator: &Locator, index: usize) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend
            .select_option(locator, &OptionChoice::Index(index))
            .await
    }

    /// Wait visible, then hover the pointer over the element.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn hover(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend.hover(locator).await
    }

    /// Wait visible, then double-click.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn double_click(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend.double_click(locator).await
    }

    /// Wait visible, then right-click.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn right_click(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_visible(locator, None).await?;
        self.backend.right_click(locator).await
    }

    /// Wait both ends visible, then drag source onto target.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn drag_and_drop(&self, source: &Locator, target: &Locator) -> ComprarResult<()> {
        let _ = self.wait_visible(source, None).await?;
        let _ = self.wait_visible(target, None).await?;
        self.backend.drag_and_drop(source, target).await
    }

    /// Wait present, then scroll the element into the viewport.
    ///
    /// # Errors
    ///
    /// Wait and backend errors propagate unchanged.
    pub async fn scroll_into_view(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.wait_present(locator, None).await?;
        self.backend.scroll_into_view(locator).await
    }

    /// Static, unconditional sleep.
    ///
    /// Use only when there is no observable readiness signal; it both
    /// under- and over-waits nondeterministically.
    pub async fn sleep(&self, duration: Duration) {
        tracing::debug!(?duration, "static sleep");
        tokio::time::sleep(duration).await;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockElement};

    fn fast_interactor(backend: &MockBackend) -> Interactor {
        Interactor::with_options(
            Arc::new(backend.clone()),
            WaitOptions::new()
                .with_timeout(Duration::from_millis(200))
                .with_poll_interval(Duration::from_millis(10)),
        )
    }

    mod wait_condition_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_visible_immediate() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#login-button", MockElement::text("LOGIN")))
                .await;

            let interactor = fast_interactor(&backend);
            let snapshot = interactor
                .wait_visible(&Locator::id("login-button"), None)
                .await
                .unwrap();
            assert_eq!(snapshot.text, "LOGIN");
        }

        #[tokio::test]
        async fn test_wait_visible_succeeds_when_element_appears_later() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);

            let late = backend.clone();
            let inserter = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                late.with_doc(|doc| doc.insert_one("#late", MockElement::text("here")))
                    .await;
            });

            let snapshot = interactor.wait_visible(&Locator::id("late"), None).await;
            inserter.await.unwrap();
            assert!(snapshot.is_ok());
        }

        #[tokio::test]
        async fn test_wait_visible_times_out_with_typed_error() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);

            let start = std::time::Instant::now();
            let result = interactor.wait_visible(&Locator::id("ghost"), None).await;
            let elapsed = start.elapsed();

            assert!(matches!(
                result,
                Err(ComprarError::ElementNotVisible { .. })
            ));
            // Bounded: roughly the configured timeout, never indefinite.
            assert!(elapsed >= Duration::from_millis(200));
            assert!(elapsed < Duration::from_secs(2));
        }

        #[tokio::test]
        async fn test_wait_visible_ignores_hidden_elements() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#hidden", MockElement::text("x").hidden()))
                .await;

            let interactor = fast_interactor(&backend);
            let result = interactor.wait_visible(&Locator::id("hidden"), None).await;
            assert!(matches!(
                result,
                Err(ComprarError::ElementNotVisible { .. })
            ));
        }

        #[tokio::test]
        async fn test_wait_clickable_rejects_disabled() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#continue", MockElement::text("GO").disabled()))
                .await;

            let interactor = fast_interactor(&backend);
            let result = interactor
                .wait_clickable(&Locator::id("continue"), None)
                .await;
            assert!(matches!(
                result,
                Err(ComprarError::ElementNotClickable { .. })
            ));
        }

        #[tokio::test]
        async fn test_wait_present_accepts_hidden() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#hidden", MockElement::text("x").hidden()))
                .await;

            let interactor = fast_interactor(&backend);
            let snapshot = interactor
                .wait_present(&Locator::id("hidden"), None)
                .await
                .unwrap();
            assert!(!snapshot.visible);
        }

        #[tokio::test]
        async fn test_wait_all_visible() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| {
                    doc.insert(
                        ".inventory_item",
                        vec![MockElement::text("a"), MockElement::text("b")],
                    );
                })
                .await;

            let interactor = fast_interactor(&backend);
            let snapshots = interactor
                .wait_all_visible(&Locator::class("inventory_item"), None)
                .await
                .unwrap();
            assert_eq!(snapshots.len(), 2);
        }

        #[tokio::test]
        async fn test_wait_all_visible_fails_if_one_hidden() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| {
                    doc.insert(
                        ".inventory_item",
                        vec![MockElement::text("a"), MockElement::text("b").hidden()],
                    );
                })
                .await;

            let interactor = fast_interactor(&backend);
            let result = interactor
                .wait_all_visible(&Locator::class("inventory_item"), None)
                .await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_wait_invisible_on_absent_element() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            assert!(interactor
                .wait_invisible(&Locator::id("gone"), None)
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_wait_invisible_times_out_on_visible_element() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#spinner", MockElement::text("loading")))
                .await;

            let interactor = fast_interactor(&backend);
            let result = interactor.wait_invisible(&Locator::id("spinner"), None).await;
            assert!(matches!(result, Err(ComprarError::ConditionTimeout { .. })));
        }

        #[tokio::test]
        async fn test_wait_for_custom_condition() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);

            let mut polls = 0;
            let result = interactor
                .wait_for("three polls", None, move || {
                    polls += 1;
                    let done = polls >= 3;
                    async move { Ok(done.then_some(polls)) }
                })
                .await
                .unwrap();
            assert_eq!(result, 3);
        }

        #[tokio::test]
        async fn test_wait_for_document_ready_after_navigation() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            backend.navigate("https://shop.test/v1/").await.unwrap();
            assert!(interactor.wait_for_document_ready().await.is_ok());
        }

        #[tokio::test]
        async fn test_wait_url_contains() {
            let backend = MockBackend::new();
            backend.navigate("https://shop.test/inventory.html").await.unwrap();
            let interactor = fast_interactor(&backend);
            assert!(interactor
                .wait_url_contains("/inventory.html", None)
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_per_call_timeout_overrides_default() {
            let backend = MockBackend::new();
            let interactor = Interactor::with_options(
                Arc::new(backend.clone()),
                WaitOptions::new()
                    .with_timeout(Duration::from_secs(30))
                    .with_poll_interval(Duration::from_millis(10)),
            );

            let start = std::time::Instant::now();
            let result = interactor
                .wait_visible(&Locator::id("ghost"), Some(Duration::from_millis(50)))
                .await;
            assert!(result.is_err());
            assert!(start.elapsed() < Duration::from_secs(5));
        }
    }

    mod probe_tests {
        use super::*;

        #[tokio::test]
        async fn test_probe_visible_absent_is_none_not_error() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            let probe = interactor
                .probe_visible(&Locator::class("shopping_cart_badge"), None)
                .await
                .unwrap();
            assert!(probe.is_none());
        }

        #[tokio::test]
        async fn test_probe_visible_is_idempotent_on_unchanged_page() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#user-name", MockElement::default()))
                .await;

            let interactor = fast_interactor(&backend);
            let locator = Locator::id("user-name");
            let first = interactor.probe_visible(&locator, None).await.unwrap();
            let second = interactor.probe_visible(&locator, None).await.unwrap();
            assert_eq!(first.is_some(), second.is_some());
        }

        #[tokio::test]
        async fn test_probe_all_visible_filters_hidden() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| {
                    doc.insert(
                        ".cart_item",
                        vec![MockElement::text("a"), MockElement::text("b").hidden()],
                    );
                })
                .await;

            let interactor = fast_interactor(&backend);
            let visible = interactor
                .probe_all_visible(&Locator::class("cart_item"), None)
                .await
                .unwrap();
            assert_eq!(visible.len(), 1);
        }

        #[tokio::test]
        async fn test_visible_count_zero_when_absent() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            assert_eq!(
                interactor
                    .visible_count(&Locator::class("cart_item"))
                    .await
                    .unwrap(),
                0
            );
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_requires_clickable() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one("#checkout", MockElement::text("CHECKOUT").disabled()))
                .await;

            let interactor = fast_interactor(&backend);
            let result = interactor.click(&Locator::id("checkout")).await;
            assert!(matches!(
                result,
                Err(ComprarError::ElementNotClickable { .. })
            ));
        }

        #[tokio::test]
        async fn test_type_text_replaces_prior_content() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| {
                    doc.insert_one("#first-name", MockElement::default().attr("value", "xyz"));
                })
                .await;

            let interactor = fast_interactor(&backend);
            let locator = Locator::id("first-name");
            interactor.type_text(&locator, "abc").await.unwrap();

            let value = interactor.read_attribute(&locator, "value").await.unwrap();
            assert_eq!(value.as_deref(), Some("abc"));
        }

        #[tokio::test]
        async fn test_read_text_waits_visible_first() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| doc.insert_one(".title", MockElement::text("Products")))
                .await;

            let interactor = fast_interactor(&backend);
            assert_eq!(
                interactor.read_text(&Locator::class("title")).await.unwrap(),
                "Products"
            );
        }

        #[tokio::test]
        async fn test_read_text_on_absent_element_is_not_visible_error() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            let result = interactor.read_text(&Locator::class("title")).await;
            assert!(matches!(
                result,
                Err(ComprarError::ElementNotVisible { .. })
            ));
        }

        #[tokio::test]
        async fn test_select_by_label_updates_control() {
            let backend = MockBackend::new();
            backend
                .with_doc(|doc| {
                    doc.insert_one(".product_sort_container", MockElement::text("Name (A to Z)"));
                })
                .await;

            let interactor = fast_interactor(&backend);
            let locator = Locator::class("product_sort_container");
            interactor
                .select_by_label(&locator, "Price (low to high)")
                .await
                .unwrap();
            assert_eq!(
                interactor.read_text(&locator).await.unwrap(),
                "Price (low to high)"
            );
        }

        #[tokio::test]
        async fn test_sleep_waits_at_least_duration() {
            let backend = MockBackend::new();
            let interactor = fast_interactor(&backend);
            let start = std::time::Instant::now();
            interactor.sleep(Duration::from_millis(30)).await;
            assert!(start.elapsed() >= Duration::from_millis(30));
        }
    }
}
