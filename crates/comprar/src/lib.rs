//! Comprar: page-object e2e test automation for the sample storefront.
//!
//! Drives a real browser through the storefront's login → inventory →
//! cart → checkout flow. The layering is strict:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  scenario steps (comprar-cli)                                │
//! │        │ dispatch only                                       │
//! │  page objects (pages::*)           one struct per screen     │
//! │        │ every interaction                                   │
//! │  synchronization layer (wait::Interactor)   wait, then act   │
//! │        │                                                     │
//! │  backend (Backend trait)    CDP browser or in-memory mock    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Page objects never touch the backend directly and step definitions
//! never touch the synchronization layer: un-waited access is the primary
//! source of flaky failures in this class of suite.
//!
//! Real browser control requires the `browser` feature; everything else,
//! including the whole test suite, runs against [`mock::MockBackend`].

#![warn(missing_docs)]

/// The browser-driving capability seam
pub mod backend;
/// Suite configuration
pub mod config;
/// Per-scenario shared context
pub mod context;
/// Scenario lifecycle hooks
pub mod hooks;
/// Declarative element locators
pub mod locator;
/// Scriptable in-memory backend
pub mod mock;
/// Page objects, one per screen
pub mod pages;
/// Run reporting
pub mod report;
/// Result and error types
pub mod result;
/// On-failure screenshot capture
pub mod screenshot;
/// Browser session factory
pub mod session;
/// Explicit waits and interaction primitives
pub mod wait;

pub use backend::{Backend, ElementSnapshot, OptionChoice};
pub use config::Settings;
pub use context::ScenarioContext;
pub use hooks::{after_scenario, before_scenario, FailureDiagnostics};
pub use locator::Locator;
pub use pages::{CartPage, CheckoutPage, InventoryPage, LoginPage, Page};
pub use report::{RunReport, ScenarioRecord, ScenarioStatus, StepRecord};
pub use result::{ComprarError, ComprarResult};
pub use screenshot::ScreenshotSink;
pub use session::{BrowserKind, Session, SessionConfig, SessionFactory};
pub use wait::{Interactor, WaitOptions};
