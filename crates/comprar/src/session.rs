//! Browser session factory.
//!
//! A [`Session`] is one live browser bound to one scenario: created by a
//! [`SessionFactory`] the caller owns, lent to page objects for the
//! scenario's duration, and closed unconditionally at teardown. Sessions
//! are never reused across scenarios.
//!
//! With the `browser` feature the factory launches a real chromium-family
//! browser over CDP, configured with a fixed set of stability options
//! (sandbox disabled, fixed viewport, extensions disabled). Without it,
//! [`SessionFactory::launch`] fails and tests construct sessions over the
//! in-memory [`crate::mock::MockBackend`] instead.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::Settings;
use crate::result::{ComprarError, ComprarResult};

/// Supported browser families.
///
/// The driving engine is CDP, so Chromium and Edge (chromium-based) launch
/// natively; Firefox is not CDP-drivable and falls back to Chromium with a
/// warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    /// Chromium / Chrome
    #[default]
    Chromium,
    /// Microsoft Edge (chromium-based)
    Edge,
    /// Firefox (falls back to Chromium at launch)
    Firefox,
}

impl BrowserKind {
    /// Parse a configuration value. Absent or unrecognized values select
    /// Chromium.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Self::Chromium,
            "edge" => Self::Edge,
            "firefox" => Self::Firefox,
            other => {
                tracing::warn!(browser = other, "unknown browser kind, using chromium");
                Self::Chromium
            }
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chromium => write!(f, "chromium"),
            Self::Edge => write!(f, "edge"),
            Self::Firefox => write!(f, "firefox"),
        }
    }
}

/// Launch configuration for one browser session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Browser family to launch
    pub kind: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Sandbox mode (disabled for CI containers)
    pub sandbox: bool,
    /// Explicit executable path (None = auto-detect)
    pub executable: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chromium,
            headless: false,
            viewport_width: 1920,
            viewport_height: 1080,
            sandbox: false,
            executable: None,
        }
    }
}

impl SessionConfig {
    /// Session configuration derived from suite settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            kind: BrowserKind::parse(settings.browser()),
            headless: settings.headless(),
            ..Self::default()
        }
    }

    /// Set the browser kind
    #[must_use]
    pub const fn with_kind(mut self, kind: BrowserKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set an explicit browser executable
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<String>) -> Self {
        self.executable = Some(path.into());
        self
    }
}

/// One live browser session, exclusively owned by one scenario.
#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap an already-constructed backend (used with the mock backend in
    /// tests).
    #[must_use]
    pub fn from_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// The driving capability, lent to the synchronization layer.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Close the underlying browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to shut down.
    pub async fn close(&self) -> ComprarResult<()> {
        self.backend.close().await
    }
}

/// Factory producing ready-to-use sessions.
///
/// Construction is explicit and the returned [`Session`] is owned by the
/// caller, who must close it; there is no ambient browser state.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: SessionConfig,
}

impl SessionFactory {
    /// Factory for the given launch configuration.
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Factory configured from suite settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(SessionConfig::from_settings(settings))
    }

    /// The launch configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Launch a new browser session.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::SessionCreation`] when the browser cannot be
    /// started, or when the crate was built without the `browser` feature.
    #[cfg(feature = "browser")]
    pub async fn launch(&self) -> ComprarResult<Session> {
        let backend = cdp::CdpBackend::launch(&self.config).await?;
        Ok(Session::from_backend(Arc::new(backend)))
    }

    /// Launch a new browser session.
    ///
    /// # Errors
    ///
    /// Always fails: this build has no browser support.
    #[cfg(not(feature = "browser"))]
    pub async fn launch(&self) -> ComprarResult<Session> {
        Err(ComprarError::SessionCreation {
            message: "built without the `browser` feature; enable it for real browser control"
                .into(),
        })
    }
}

// ============================================================================
// CDP implementation (feature `browser`)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserKind, SessionConfig};
    use crate::backend::{Backend, ElementSnapshot, OptionChoice};
    use crate::locator::Locator;
    use crate::result::{ComprarError, ComprarResult};

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams, HandleJavaScriptDialogParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct SnapshotDto {
        visible: bool,
        enabled: bool,
        text: String,
        attributes: HashMap<String, String>,
    }

    #[derive(Debug, Deserialize)]
    struct Center {
        x: f64,
        y: f64,
    }

    fn session_err(e: impl std::fmt::Display) -> ComprarError {
        ComprarError::SessionCreation {
            message: e.to_string(),
        }
    }

    fn interaction_err(e: impl std::fmt::Display) -> ComprarError {
        ComprarError::Interaction {
            message: e.to_string(),
        }
    }

    /// Real browser backend over the Chrome DevTools Protocol.
    #[derive(Debug)]
    pub(super) struct CdpBackend {
        browser: Arc<Mutex<CdpBrowser>>,
        page: CdpPage,
        #[allow(dead_code)]
        handler: tokio::task::JoinHandle<()>,
    }

    impl CdpBackend {
        pub(super) async fn launch(config: &SessionConfig) -> ComprarResult<Self> {
            if config.kind == BrowserKind::Firefox {
                tracing::warn!("firefox is not CDP-drivable, falling back to chromium");
            }

            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-extensions");

            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.executable {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(session_err)?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config).await.map_err(session_err)?;

            // Pump CDP protocol messages for the session's lifetime.
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(session_err)?;

            tracing::info!(
                kind = %config.kind,
                headless = config.headless,
                "browser session launched"
            );

            Ok(Self {
                browser: Arc::new(Mutex::new(browser)),
                page,
                handler: handle,
            })
        }

        async fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> ComprarResult<T> {
            let result = self.page.evaluate(script).await.map_err(interaction_err)?;
            result.into_value().map_err(interaction_err)
        }

        /// Center of the first match in viewport coordinates, scrolled into
        /// view first so the point is hit-testable.
        async fn element_center(&self, locator: &Locator) -> ComprarResult<Center> {
            let script = format!(
                "(() => {{ const el = ({})[0]; if (!el) return null; \
                 el.scrollIntoView({{block: 'center', inline: 'center'}}); \
                 const r = el.getBoundingClientRect(); \
                 return {{x: r.x + r.width / 2, y: r.y + r.height / 2}}; }})()",
                locator.to_query()
            );
            let center: Option<Center> = self.eval(&script).await?;
            center.ok_or_else(|| ComprarError::Interaction {
                message: format!("no element matching {locator}"),
            })
        }

        async fn mouse_event(
            &self,
            kind: DispatchMouseEventType,
            x: f64,
            y: f64,
            button: MouseButton,
            click_count: i64,
        ) -> ComprarResult<()> {
            let params = DispatchMouseEventParams::builder()
                .r#type(kind)
                .x(x)
                .y(y)
                .button(button)
                .click_count(click_count)
                .build()
                .map_err(interaction_err)?;
            let _ = self.page.execute(params).await.map_err(interaction_err)?;
            Ok(())
        }

        async fn press_release(
            &self,
            x: f64,
            y: f64,
            button: MouseButton,
            click_count: i64,
        ) -> ComprarResult<()> {
            self.mouse_event(DispatchMouseEventType::MousePressed, x, y, button.clone(), click_count)
                .await?;
            self.mouse_event(DispatchMouseEventType::MouseReleased, x, y, button, click_count)
                .await
        }
    }

    #[async_trait]
    impl Backend for CdpBackend {
        async fn navigate(&self, url: &str) -> ComprarResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| ComprarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> ComprarResult<String> {
            self.eval("window.location.href").await
        }

        async fn title(&self) -> ComprarResult<String> {
            self.eval("document.title").await
        }

        async fn query(&self, locator: &Locator) -> ComprarResult<Vec<ElementSnapshot>> {
            let script = format!(
                "({}).map(el => {{ \
                 const r = el.getBoundingClientRect(); \
                 const style = window.getComputedStyle(el); \
                 const attrs = {{}}; \
                 for (const a of el.attributes) attrs[a.name] = a.value; \
                 if ('value' in el && typeof el.value === 'string') attrs['value'] = el.value; \
                 return {{ \
                   visible: r.width > 0 && r.height > 0 && \
                            style.visibility !== 'hidden' && style.display !== 'none', \
                   enabled: !el.disabled, \
                   text: (el.textContent || '').trim(), \
                   attributes: attrs \
                 }}; }})",
                locator.to_query()
            );
            let snapshots: Vec<SnapshotDto> = self.eval(&script).await?;
            Ok(snapshots
                .into_iter()
                .map(|dto| ElementSnapshot {
                    visible: dto.visible,
                    enabled: dto.enabled,
                    text: dto.text,
                    attributes: dto.attributes,
                })
                .collect())
        }

        async fn click(&self, locator: &Locator) -> ComprarResult<()> {
            let center = self.element_center(locator).await?;
            self.mouse_event(
                DispatchMouseEventType::MouseMoved,
                center.x,
                center.y,
                MouseButton::None,
                0,
            )
            .await?;
            self.press_release(center.x, center.y, MouseButton::Left, 1)
                .await
        }

        async fn click_via_script(&self, locator: &Locator) -> ComprarResult<()> {
            let script = format!(
                "(() => {{ const el = ({})[0]; if (!el) return false; el.click(); return true; }})()",
                locator.to_query()
            );
            let clicked: bool = self.eval(&script).await?;
            if clicked {
                Ok(())
            } else {
                Err(ComprarError::Interaction {
                    message: format!("no element matching {locator}"),
                })
            }
        }

        async fn clear_and_type(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
            let script = format!(
                "(() => {{ const el = ({})[0]; if (!el) return false; \
                 el.focus(); el.value = ''; el.value = {text:?}; \
                 el.dispatchEvent(new Event('input', {{bubbles: true}})); \
                 el.dispatchEvent(new Event('change', {{bubbles: true}})); \
                 return true; }})()",
                locator.to_query()
            );
            let typed: bool = self.eval(&script).await?;
            if typed {
                Ok(())
            } else {
                Err(ComprarError::Interaction {
                    message: format!("no element matching {locator}"),
                })
            }
        }

        async fn select_option(
            &self,
            locator: &Locator,
            choice: &OptionChoice,
        ) -> ComprarResult<()> {
            let pick = match choice {
                OptionChoice::Label(label) => format!(
                    "const i = Array.from(el.options)\
                     .findIndex(o => o.textContent.trim() === {label:?}); \
                     if (i < 0) return false; el.selectedIndex = i;"
                ),
                OptionChoice::Value(value) => format!("el.value = {value:?};"),
                OptionChoice::Index(index) => format!(
                    "if ({index} >= el.options.length) return false; el.selectedIndex = {index};"
                ),
            };
            let script = format!(
                "(() => {{ const el = ({})[0]; if (!el) return false; {pick} \
                 el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
                locator.to_query()
            );
            let selected: bool = self.eval(&script).await?;
            if selected {
                Ok(())
            } else {
                Err(ComprarError::Interaction {
                    message: format!("could not select {choice} in {locator}"),
                })
            }
        }

        async fn hover(&self, locator: &Locator) -> ComprarResult<()> {
            let center = self.element_center(locator).await?;
            self.mouse_event(
                DispatchMouseEventType::MouseMoved,
                center.x,
                center.y,
                MouseButton::None,
                0,
            )
            .await
        }

        async fn double_click(&self, locator: &Locator) -> ComprarResult<()> {
            let center = self.element_center(locator).await?;
            self.press_release(center.x, center.y, MouseButton::Left, 1)
                .await?;
            self.press_release(center.x, center.y, MouseButton::Left, 2)
                .await
        }

        async fn right_click(&self, locator: &Locator) -> ComprarResult<()> {
            let center = self.element_center(locator).await?;
            self.press_release(center.x, center.y, MouseButton::Right, 1)
                .await
        }

        async fn drag_and_drop(&self, source: &Locator, target: &Locator) -> ComprarResult<()> {
            let from = self.element_center(source).await?;
            let to = self.element_center(target).await?;
            self.mouse_event(
                DispatchMouseEventType::MousePressed,
                from.x,
                from.y,
                MouseButton::Left,
                1,
            )
            .await?;
            self.mouse_event(
                DispatchMouseEventType::MouseMoved,
                to.x,
                to.y,
                MouseButton::Left,
                0,
            )
            .await?;
            self.mouse_event(
                DispatchMouseEventType::MouseReleased,
                to.x,
                to.y,
                MouseButton::Left,
                1,
            )
            .await
        }

        async fn scroll_into_view(&self, locator: &Locator) -> ComprarResult<()> {
            let script = format!(
                "(() => {{ const el = ({})[0]; if (!el) return false; \
                 el.scrollIntoView({{block: 'center'}}); return true; }})()",
                locator.to_query()
            );
            let scrolled: bool = self.eval(&script).await?;
            if scrolled {
                Ok(())
            } else {
                Err(ComprarError::Interaction {
                    message: format!("no element matching {locator}"),
                })
            }
        }

        async fn eval_bool(&self, script: &str) -> ComprarResult<bool> {
            self.eval(&format!("Boolean({script})")).await
        }

        async fn dismiss_dialog(&self) -> ComprarResult<bool> {
            let params = HandleJavaScriptDialogParams::builder()
                .accept(false)
                .build()
                .map_err(interaction_err)?;
            // Fails when no dialog is open, which is the common case.
            Ok(self.page.execute(params).await.is_ok())
        }

        async fn screenshot(&self) -> ComprarResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot =
                self.page
                    .execute(params)
                    .await
                    .map_err(|e| ComprarError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| ComprarError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&self) -> ComprarResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(session_err)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod browser_kind_tests {
        use super::*;

        #[test]
        fn test_parse_known_kinds() {
            assert_eq!(BrowserKind::parse("chrome"), BrowserKind::Chromium);
            assert_eq!(BrowserKind::parse("Chromium"), BrowserKind::Chromium);
            assert_eq!(BrowserKind::parse("edge"), BrowserKind::Edge);
            assert_eq!(BrowserKind::parse("firefox"), BrowserKind::Firefox);
        }

        #[test]
        fn test_parse_unknown_defaults_to_chromium() {
            assert_eq!(BrowserKind::parse("netscape"), BrowserKind::Chromium);
            assert_eq!(BrowserKind::parse(""), BrowserKind::Chromium);
        }
    }

    mod session_config_tests {
        use super::*;

        #[test]
        fn test_default_stability_options() {
            let config = SessionConfig::default();
            assert_eq!(config.viewport_width, 1920);
            assert_eq!(config.viewport_height, 1080);
            assert!(!config.sandbox);
            assert!(!config.headless);
        }

        #[test]
        fn test_from_settings() {
            let mut settings = Settings::defaults();
            settings.set("browser", "edge");
            settings.set("headless", "true");
            let config = SessionConfig::from_settings(&settings);
            assert_eq!(config.kind, BrowserKind::Edge);
            assert!(config.headless);
        }

        #[test]
        fn test_builder_chain() {
            let config = SessionConfig::default()
                .with_kind(BrowserKind::Edge)
                .with_headless(true)
                .with_viewport(1280, 720)
                .with_executable("/usr/bin/chromium");
            assert_eq!(config.kind, BrowserKind::Edge);
            assert!(config.headless);
            assert_eq!(config.viewport_width, 1280);
            assert_eq!(config.executable.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    mod session_tests {
        use super::*;
        use crate::mock::MockBackend;

        #[tokio::test]
        async fn test_session_over_mock_backend() {
            let backend = Arc::new(MockBackend::new());
            let session = Session::from_backend(backend.clone());
            assert!(session.close().await.is_ok());
            assert!(backend.is_closed().await);
        }

        #[cfg(not(feature = "browser"))]
        #[tokio::test]
        async fn test_launch_without_browser_feature_fails() {
            let factory = SessionFactory::new(SessionConfig::default());
            let result = factory.launch().await;
            assert!(matches!(
                result,
                Err(crate::result::ComprarError::SessionCreation { .. })
            ));
        }
    }
}
