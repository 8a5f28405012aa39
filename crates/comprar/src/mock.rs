//! In-memory mock backend.
//!
//! [`MockBackend`] implements the full [`Backend`] contract against a
//! scriptable in-memory document instead of a live browser. Element lists
//! are keyed by their base CSS selector and resolved with the same
//! structural rules the CDP backend compiles to script ([`Locator::Nth`]
//! indexes the list, [`Locator::ItemByName`] resolves parallel lists by the
//! matching name's index).
//!
//! Tests script page behavior by registering click and navigation handlers
//! that mutate the document, which is enough to model the storefront's
//! screen transitions without a browser.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backend::{Backend, ElementSnapshot, OptionChoice};
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};

/// One element in the mock document.
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Rendered and visible
    pub visible: bool,
    /// Enabled for interaction
    pub enabled: bool,
    /// Text content
    pub text: String,
    /// Attribute map (form control values live under `value`)
    pub attributes: HashMap<String, String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            text: String::new(),
            attributes: HashMap::new(),
        }
    }
}

impl MockElement {
    /// A visible, enabled element with the given text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Mark the element present but not visible.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark the element disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            visible: self.visible,
            enabled: self.enabled,
            text: self.text.trim().to_string(),
            attributes: self.attributes.clone(),
        }
    }
}

/// The mock page: element lists keyed by base CSS selector, plus URL,
/// title and readiness state.
#[derive(Debug, Default)]
pub struct MockDocument {
    url: String,
    title: String,
    ready: bool,
    elements: HashMap<String, Vec<MockElement>>,
}

impl MockDocument {
    /// Replace the element list for a selector.
    pub fn insert(&mut self, css: impl Into<String>, elements: Vec<MockElement>) {
        let _ = self.elements.insert(css.into(), elements);
    }

    /// Replace the selector's list with a single element.
    pub fn insert_one(&mut self, css: impl Into<String>, element: MockElement) {
        self.insert(css, vec![element]);
    }

    /// Remove every element matching a selector.
    pub fn remove(&mut self, css: &str) {
        let _ = self.elements.remove(css);
    }

    /// Drop the whole document (used by navigation handlers before
    /// rendering a new screen).
    pub fn clear(&mut self) {
        self.elements.clear();
        self.ready = false;
    }

    /// Elements under a selector, if any.
    #[must_use]
    pub fn get(&self, css: &str) -> Option<&Vec<MockElement>> {
        self.elements.get(css)
    }

    /// Mutable elements under a selector, if any.
    pub fn get_mut(&mut self, css: &str) -> Option<&mut Vec<MockElement>> {
        self.elements.get_mut(css)
    }

    /// Mutate one element in place. No-op if it does not exist.
    pub fn update<F: FnOnce(&mut MockElement)>(&mut self, css: &str, index: usize, f: F) {
        if let Some(element) = self.elements.get_mut(css).and_then(|list| list.get_mut(index)) {
            f(element);
        }
    }

    /// Set the current URL.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Set the page title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the document-ready flag.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Current URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve a locator to `(base_css, index)` positions of its matches.
    fn resolve(&self, locator: &Locator) -> Vec<(String, usize)> {
        match locator {
            Locator::Id(_) | Locator::Css(_) | Locator::ClassName(_) => {
                let css = locator.base_css();
                let len = self.elements.get(&css).map_or(0, Vec::len);
                (0..len).map(|i| (css.clone(), i)).collect()
            }
            Locator::Nth { css, index } => {
                let len = self.elements.get(css).map_or(0, Vec::len);
                if *index < len {
                    vec![(css.clone(), *index)]
                } else {
                    vec![]
                }
            }
            Locator::ItemByName {
                name_css,
                name,
                target_css,
            } => {
                let Some(names) = self.elements.get(name_css) else {
                    return vec![];
                };
                let Some(index) = names.iter().position(|e| e.text.trim() == name) else {
                    return vec![];
                };
                let len = self.elements.get(target_css).map_or(0, Vec::len);
                if index < len {
                    vec![(target_css.clone(), index)]
                } else {
                    vec![]
                }
            }
        }
    }

    fn element(&self, css: &str, index: usize) -> Option<&MockElement> {
        self.elements.get(css).and_then(|list| list.get(index))
    }
}

type ClickHandler = Box<dyn FnMut(&mut MockDocument, usize) + Send>;
type NavigateHandler = Box<dyn FnMut(&mut MockDocument, &str) + Send>;

#[derive(Default)]
struct MockState {
    doc: MockDocument,
    click_handlers: HashMap<String, ClickHandler>,
    navigate_handler: Option<NavigateHandler>,
    dialog_open: bool,
    closed: bool,
    screenshot_png: Vec<u8>,
    fail_screenshots: bool,
}

/// Scriptable in-memory implementation of [`Backend`].
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend").finish_non_exhaustive()
    }
}

impl MockBackend {
    /// A mock backend with an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the document for test setup.
    pub async fn with_doc<F: FnOnce(&mut MockDocument)>(&self, f: F) {
        let mut state = self.state.lock().await;
        f(&mut state.doc);
    }

    /// Register a click handler for a base selector. The handler receives
    /// the document and the clicked element's index within the list.
    pub async fn on_click<F>(&self, css: impl Into<String>, handler: F)
    where
        F: FnMut(&mut MockDocument, usize) + Send + 'static,
    {
        let mut state = self.state.lock().await;
        let _ = state.click_handlers.insert(css.into(), Box::new(handler));
    }

    /// Register a navigation handler, invoked with the target URL so it can
    /// render the corresponding screen into the document.
    pub async fn on_navigate<F>(&self, handler: F)
    where
        F: FnMut(&mut MockDocument, &str) + Send + 'static,
    {
        let mut state = self.state.lock().await;
        state.navigate_handler = Some(Box::new(handler));
    }

    /// Open a native dialog that [`Backend::dismiss_dialog`] will close.
    pub async fn open_dialog(&self) {
        self.state.lock().await.dialog_open = true;
    }

    /// Set the PNG payload returned by screenshots.
    pub async fn set_screenshot_png(&self, data: Vec<u8>) {
        self.state.lock().await.screenshot_png = data;
    }

    /// Make screenshot capture fail, for exercising the best-effort path.
    pub async fn fail_screenshots(&self, fail: bool) {
        self.state.lock().await.fail_screenshots = fail;
    }

    /// Whether the session has been closed.
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    async fn guard_open(&self) -> ComprarResult<()> {
        if self.state.lock().await.closed {
            return Err(ComprarError::Interaction {
                message: "session is closed".into(),
            });
        }
        Ok(())
    }

    /// Resolve the first match and run any registered click handler on it.
    async fn dispatch_click(&self, locator: &Locator, times: usize) -> ComprarResult<()> {
        self.guard_open().await?;
        let mut state = self.state.lock().await;
        let state = &mut *state;
        let Some((css, index)) = state.doc.resolve(locator).into_iter().next() else {
            return Err(ComprarError::Interaction {
                message: format!("no element matching {locator}"),
            });
        };
        if let Some(handler) = state.click_handlers.get_mut(&css) {
            for _ in 0..times {
                handler(&mut state.doc, index);
            }
        }
        Ok(())
    }

    async fn require_match(&self, locator: &Locator) -> ComprarResult<(String, usize)> {
        self.guard_open().await?;
        let state = self.state.lock().await;
        state
            .doc
            .resolve(locator)
            .into_iter()
            .next()
            .ok_or_else(|| ComprarError::Interaction {
                message: format!("no element matching {locator}"),
            })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn navigate(&self, url: &str) -> ComprarResult<()> {
        self.guard_open().await?;
        let mut state = self.state.lock().await;
        let state = &mut *state;
        if let Some(handler) = state.navigate_handler.as_mut() {
            handler(&mut state.doc, url);
        }
        state.doc.set_url(url);
        state.doc.set_ready(true);
        Ok(())
    }

    async fn current_url(&self) -> ComprarResult<String> {
        self.guard_open().await?;
        Ok(self.state.lock().await.doc.url.clone())
    }

    async fn title(&self) -> ComprarResult<String> {
        self.guard_open().await?;
        Ok(self.state.lock().await.doc.title.clone())
    }

    async fn query(&self, locator: &Locator) -> ComprarResult<Vec<ElementSnapshot>> {
        self.guard_open().await?;
        let state = self.state.lock().await;
        Ok(state
            .doc
            .resolve(locator)
            .into_iter()
            .filter_map(|(css, index)| state.doc.element(&css, index))
            .map(MockElement::snapshot)
            .collect())
    }

    async fn click(&self, locator: &Locator) -> ComprarResult<()> {
        self.dispatch_click(locator, 1).await
    }

    async fn click_via_script(&self, locator: &Locator) -> ComprarResult<()> {
        // Script clicks skip hit-testing; in the mock the dispatch is
        // identical since there is no occlusion to bypass.
        self.dispatch_click(locator, 1).await
    }

    async fn clear_and_type(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        let (css, index) = self.require_match(locator).await?;
        let mut state = self.state.lock().await;
        state.doc.update(&css, index, |element| {
            let _ = element.attributes.insert("value".into(), text.to_string());
        });
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, choice: &OptionChoice) -> ComprarResult<()> {
        let (css, index) = self.require_match(locator).await?;
        let mut state = self.state.lock().await;
        state.doc.update(&css, index, |element| match choice {
            OptionChoice::Label(label) => {
                element.text = label.clone();
                let _ = element.attributes.insert("value".into(), label.clone());
            }
            OptionChoice::Value(value) => {
                let _ = element.attributes.insert("value".into(), value.clone());
            }
            OptionChoice::Index(i) => {
                let _ = element.attributes.insert("value".into(), i.to_string());
            }
        });
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.require_match(locator).await?;
        Ok(())
    }

    async fn double_click(&self, locator: &Locator) -> ComprarResult<()> {
        self.dispatch_click(locator, 2).await
    }

    async fn right_click(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.require_match(locator).await?;
        Ok(())
    }

    async fn drag_and_drop(&self, source: &Locator, target: &Locator) -> ComprarResult<()> {
        let _ = self.require_match(source).await?;
        let _ = self.require_match(target).await?;
        Ok(())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> ComprarResult<()> {
        let _ = self.require_match(locator).await?;
        Ok(())
    }

    async fn eval_bool(&self, script: &str) -> ComprarResult<bool> {
        self.guard_open().await?;
        let state = self.state.lock().await;
        if script.contains("readyState") {
            return Ok(state.doc.ready);
        }
        Ok(true)
    }

    async fn dismiss_dialog(&self) -> ComprarResult<bool> {
        self.guard_open().await?;
        let mut state = self.state.lock().await;
        let was_open = state.dialog_open;
        state.dialog_open = false;
        Ok(was_open)
    }

    async fn screenshot(&self) -> ComprarResult<Vec<u8>> {
        self.guard_open().await?;
        let state = self.state.lock().await;
        if state.fail_screenshots {
            return Err(ComprarError::Screenshot {
                message: "capture failed".into(),
            });
        }
        Ok(state.screenshot_png.clone())
    }

    async fn close(&self) -> ComprarResult<()> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}
