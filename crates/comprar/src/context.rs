//! Per-scenario shared context.
//!
//! One [`ScenarioContext`] per scenario: it owns the scenario's [`Session`]
//! and one instance of each page object, all sharing the same interactable
//! session. Contexts are never reused across scenarios; the session is
//! closed with the context at teardown.

use std::sync::Arc;

use crate::config::Settings;
use crate::pages::{CartPage, CheckoutPage, InventoryPage, LoginPage};
use crate::screenshot::ScreenshotSink;
use crate::session::Session;
use crate::wait::Interactor;

/// The session and page-object set shared by every step within one
/// scenario.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    settings: Arc<Settings>,
    session: Session,
    interactor: Interactor,
    sink: ScreenshotSink,
    login: LoginPage,
    inventory: InventoryPage,
    cart: CartPage,
    checkout: CheckoutPage,
}

impl ScenarioContext {
    /// Build the context over a freshly launched session.
    #[must_use]
    pub fn new(session: Session, settings: Arc<Settings>) -> Self {
        let interactor = Interactor::from_settings(session.backend(), &settings);
        let sink = ScreenshotSink::from_settings(&settings);
        let login = LoginPage::new(interactor.clone(), sink.clone(), Arc::clone(&settings));
        let inventory = InventoryPage::new(interactor.clone(), sink.clone());
        let cart = CartPage::new(interactor.clone(), sink.clone());
        let checkout = CheckoutPage::new(interactor.clone(), sink.clone());
        Self {
            settings,
            session,
            interactor,
            sink,
            login,
            inventory,
            cart,
            checkout,
        }
    }

    /// Suite settings.
    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// The scenario's browser session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The shared synchronization-layer capability.
    #[must_use]
    pub const fn interactor(&self) -> &Interactor {
        &self.interactor
    }

    /// The failure-screenshot sink.
    #[must_use]
    pub const fn sink(&self) -> &ScreenshotSink {
        &self.sink
    }

    /// Login screen.
    #[must_use]
    pub const fn login(&self) -> &LoginPage {
        &self.login
    }

    /// Inventory screen.
    #[must_use]
    pub const fn inventory(&self) -> &InventoryPage {
        &self.inventory
    }

    /// Cart screen.
    #[must_use]
    pub const fn cart(&self) -> &CartPage {
        &self.cart
    }

    /// Checkout screens.
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutPage {
        &self.checkout
    }
}
