//! Page objects for the storefront screens.
//!
//! One struct per logical screen, each a fixed set of eagerly-built
//! [`Locator`] values plus methods that close over a shared [`Interactor`]
//! (capability composition, no base-class inheritance). All raw interaction
//! is delegated to the synchronization layer.
//!
//! Conventions every page follows:
//!
//! - Query predicates (`is_*_displayed`, counts) tolerate absence and
//!   return `false`/`0`/empty; "not on screen" is a valid outcome.
//! - Mutating operations and value getters propagate failures unchanged
//!   after triggering a best-effort diagnostic screenshot.
//! - `wait_until_loaded` keys on a stable element's visibility rather than
//!   a generic page-load event, because single-page-app navigations do not
//!   reliably fire full reloads.

use async_trait::async_trait;

use crate::locator::Locator;
use crate::result::{ComprarResult, ComprarError};
use crate::screenshot::ScreenshotSink;
use crate::wait::Interactor;

mod cart;
mod checkout;
mod inventory;
mod login;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use inventory::InventoryPage;
pub use login::LoginPage;

/// Common surface of every page object.
#[async_trait]
pub trait Page {
    /// Screen name, used in logs and screenshot filenames.
    fn name(&self) -> &'static str;

    /// Block until the screen's stable key elements are visible.
    async fn wait_until_loaded(&self) -> ComprarResult<()>;

    /// Coarse page-identity assertion: AND of the screen's individual
    /// element-presence checks.
    async fn verify_elements(&self) -> bool;
}

/// Screenshot-then-propagate wrapper for mutating operations and value
/// getters. The capture is fire-and-forget; the original error is returned
/// unchanged.
pub(crate) async fn guard<T>(
    interactor: &Interactor,
    sink: &ScreenshotSink,
    page: &str,
    result: ComprarResult<T>,
) -> ComprarResult<T> {
    if let Err(ref e) = result {
        tracing::error!(page, error = %e, "page operation failed");
        let backend = interactor.backend();
        let _ = sink.capture(&backend, page, e.reason_tag()).await;
    }
    result
}

/// Visibility probe flattened to a boolean. Never raises: absence and
/// probe faults both read as "not displayed".
pub(crate) async fn element_displayed(interactor: &Interactor, locator: &Locator) -> bool {
    match interactor.probe_visible(locator, None).await {
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(%locator, error = %e, "visibility probe failed");
            false
        }
    }
}

/// Enabled probe flattened to a boolean, same totality as
/// [`element_displayed`].
pub(crate) async fn element_enabled(interactor: &Interactor, locator: &Locator) -> bool {
    match interactor.probe_visible(locator, None).await {
        Ok(Some(snapshot)) => snapshot.enabled,
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(%locator, error = %e, "enabled probe failed");
            false
        }
    }
}

/// Parse a `$`-prefixed price string into a decimal amount.
pub(crate) fn parse_price(text: &str) -> ComprarResult<f64> {
    let cleaned = text.trim().trim_start_matches('$');
    cleaned.parse().map_err(|_| ComprarError::Interaction {
        message: format!("unparsable price '{text}'"),
    })
}
