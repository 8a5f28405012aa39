//! The browser-driving capability seam.
//!
//! [`Backend`] is the opaque capability every higher layer is written
//! against: it can navigate, resolve a [`Locator`] into transient element
//! snapshots, perform input, evaluate script, and capture screenshots.
//! The synchronization layer composes waits and actions on top of it; page
//! objects never touch it directly.
//!
//! Two implementations exist: a CDP backend over a real browser (feature
//! `browser`, see [`crate::session`]) and an in-memory mock
//! ([`crate::mock::MockBackend`]) used by the test suite.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::locator::Locator;
use crate::result::ComprarResult;

/// A transient snapshot of a located element.
///
/// Valid only for the instant it was taken: the next navigation or DOM
/// mutation invalidates it, so snapshots are re-resolved on every
/// synchronization-layer call and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Rendered and visible (non-zero box, not `display:none`/`hidden`)
    pub visible: bool,
    /// Enabled for interaction (no `disabled` attribute)
    pub enabled: bool,
    /// Trimmed text content
    pub text: String,
    /// Attribute map, including the live `value` of form controls
    pub attributes: HashMap<String, String>,
}

impl ElementSnapshot {
    /// A visible, enabled element with the given text.
    #[must_use]
    pub fn visible_with_text(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            enabled: true,
            text: text.into(),
            attributes: HashMap::new(),
        }
    }

    /// Attribute value by name, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the element is both visible and enabled.
    #[must_use]
    pub fn clickable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// How to pick an option from a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionChoice {
    /// By visible label text
    Label(String),
    /// By the option's `value` attribute
    Value(String),
    /// By 0-based position
    Index(usize),
}

impl std::fmt::Display for OptionChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(label) => write!(f, "label '{label}'"),
            Self::Value(value) => write!(f, "value '{value}'"),
            Self::Index(index) => write!(f, "index {index}"),
        }
    }
}

/// The browser-driving capability.
///
/// Every operation resolves its locator against the live page at call time.
/// Action operations act on the first match; the synchronization layer is
/// responsible for having established readiness immediately beforehand.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Navigate to a URL.
    async fn navigate(&self, url: &str) -> ComprarResult<()>;

    /// Current page URL.
    async fn current_url(&self) -> ComprarResult<String>;

    /// Current page title.
    async fn title(&self) -> ComprarResult<String>;

    /// Resolve a locator into snapshots of all matching elements,
    /// in document order.
    async fn query(&self, locator: &Locator) -> ComprarResult<Vec<ElementSnapshot>>;

    /// Click the first match using ordinary hit-testing.
    async fn click(&self, locator: &Locator) -> ComprarResult<()>;

    /// Click the first match from script, bypassing hit-testing.
    ///
    /// Used when an element is visible but layered beneath another for
    /// ordinary hit-testing.
    async fn click_via_script(&self, locator: &Locator) -> ComprarResult<()>;

    /// Clear the first match's current content, then enter `text`.
    async fn clear_and_type(&self, locator: &Locator, text: &str) -> ComprarResult<()>;

    /// Select an option of the first matching select control.
    async fn select_option(&self, locator: &Locator, choice: &OptionChoice) -> ComprarResult<()>;

    /// Hover the pointer over the first match.
    async fn hover(&self, locator: &Locator) -> ComprarResult<()>;

    /// Double-click the first match.
    async fn double_click(&self, locator: &Locator) -> ComprarResult<()>;

    /// Right-click the first match.
    async fn right_click(&self, locator: &Locator) -> ComprarResult<()>;

    /// Drag the first match of `source` onto the first match of `target`.
    async fn drag_and_drop(&self, source: &Locator, target: &Locator) -> ComprarResult<()>;

    /// Scroll the first match into the viewport.
    async fn scroll_into_view(&self, locator: &Locator) -> ComprarResult<()>;

    /// Evaluate a script expression in the page, coerced to a boolean.
    async fn eval_bool(&self, script: &str) -> ComprarResult<bool>;

    /// Dismiss a native dialog if one is open. Returns whether one was.
    async fn dismiss_dialog(&self) -> ComprarResult<bool>;

    /// Capture a PNG screenshot of the current page.
    async fn screenshot(&self) -> ComprarResult<Vec<u8>>;

    /// Close the underlying browser session.
    async fn close(&self) -> ComprarResult<()>;
}
