//! Shopping cart screen.

use std::time::Duration;

use async_trait::async_trait;

use super::{element_displayed, element_enabled, guard, parse_price, Page};
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::screenshot::ScreenshotSink;
use crate::wait::Interactor;

const PAGE_NAME: &str = "CartPage";

const ITEM_CSS: &str = ".cart_item";
const ITEM_NAME_CSS: &str = ".inventory_item_name";
const ITEM_PRICE_CSS: &str = ".inventory_item_price";
const ITEM_DESC_CSS: &str = ".inventory_item_desc";
const REMOVE_BUTTON_CSS: &str = ".btn_secondary";

/// Page object for the cart screen.
#[derive(Debug, Clone)]
pub struct CartPage {
    interactor: Interactor,
    sink: ScreenshotSink,
    page_title: Locator,
    cart_badge: Locator,
    menu_button: Locator,
    continue_shopping_button: Locator,
    checkout_button: Locator,
    cart_items: Locator,
    item_names: Locator,
    item_prices: Locator,
    item_descriptions: Locator,
}

impl CartPage {
    /// Build the page over a shared interactable session.
    #[must_use]
    pub fn new(interactor: Interactor, sink: ScreenshotSink) -> Self {
        Self {
            interactor,
            sink,
            page_title: Locator::class("title"),
            cart_badge: Locator::class("shopping_cart_badge"),
            menu_button: Locator::css(".bm-burger-button"),
            continue_shopping_button: Locator::id("continue-shopping"),
            checkout_button: Locator::id("checkout"),
            cart_items: Locator::css(ITEM_CSS),
            item_names: Locator::css(ITEM_NAME_CSS),
            item_prices: Locator::css(ITEM_PRICE_CSS),
            item_descriptions: Locator::css(ITEM_DESC_CSS),
        }
    }

    async fn guarded<T>(&self, result: ComprarResult<T>) -> ComprarResult<T> {
        guard(&self.interactor, &self.sink, PAGE_NAME, result).await
    }

    /// Header title text.
    pub async fn title_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.page_title).await;
        self.guarded(result).await
    }

    /// Whether the header title is on screen.
    pub async fn is_title_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.page_title).await
    }

    /// Number shown on the cart badge; `0` when absent.
    pub async fn cart_badge_count(&self) -> u32 {
        match self.interactor.probe_visible(&self.cart_badge, None).await {
            Ok(Some(snapshot)) => snapshot.text.parse().unwrap_or_else(|_| {
                tracing::warn!(text = %snapshot.text, "unparsable cart badge");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "cart badge probe failed");
                0
            }
        }
    }

    /// Go back to the inventory screen.
    pub async fn continue_shopping(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.continue_shopping_button).await;
        tracing::info!("continued shopping");
        self.guarded(result).await
    }

    /// Whether the continue-shopping button is on screen.
    pub async fn is_continue_shopping_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.continue_shopping_button).await
    }

    /// Proceed to checkout.
    pub async fn open_checkout(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.checkout_button).await;
        tracing::info!("opened checkout");
        self.guarded(result).await
    }

    /// Whether the checkout button is on screen.
    pub async fn is_checkout_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.checkout_button).await
    }

    /// Whether the checkout button is enabled.
    pub async fn is_checkout_button_enabled(&self) -> bool {
        element_enabled(&self.interactor, &self.checkout_button).await
    }

    /// Whether the burger menu button is on screen.
    pub async fn is_menu_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.menu_button).await
    }

    /// Number of line items in the cart. Zero when the list is absent,
    /// which is how an empty cart renders.
    pub async fn item_count(&self) -> usize {
        match self.interactor.visible_count(&self.cart_items).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "cart item count probe failed");
                0
            }
        }
    }

    /// Whether the cart holds no items.
    pub async fn is_empty(&self) -> bool {
        self.item_count().await == 0
    }

    /// All item names, in display order.
    pub async fn item_names(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_names, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// All item prices, in display order.
    pub async fn item_prices(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_prices, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// All item descriptions, in display order.
    pub async fn item_descriptions(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_descriptions, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// Whether the named item is in the cart.
    pub async fn contains_item(&self, name: &str) -> bool {
        match self.interactor.probe_all_visible(&self.item_names, None).await {
            Ok(snapshots) => snapshots.iter().any(|s| s.text == name),
            Err(e) => {
                tracing::warn!(error = %e, "cart item probe failed");
                false
            }
        }
    }

    /// Remove the named item from the cart.
    pub async fn remove_item_by_name(&self, name: &str) -> ComprarResult<()> {
        let locator = Locator::item_by_name(ITEM_NAME_CSS, name, REMOVE_BUTTON_CSS);
        let result = self.interactor.click(&locator).await;
        tracing::info!(item = name, "removed item from cart");
        self.guarded(result).await
    }

    /// Remove the Nth item (0-based) from the cart.
    pub async fn remove_item_by_index(&self, index: usize) -> ComprarResult<()> {
        let result = self
            .interactor
            .click(&Locator::nth(REMOVE_BUTTON_CSS, index))
            .await;
        tracing::info!(index, "removed item from cart");
        self.guarded(result).await
    }

    /// Listed price of the named item.
    pub async fn item_price_by_name(&self, name: &str) -> ComprarResult<String> {
        let locator = Locator::item_by_name(ITEM_NAME_CSS, name, ITEM_PRICE_CSS);
        let result = self.interactor.read_text(&locator).await;
        self.guarded(result).await
    }

    /// Listed price of the Nth item (0-based).
    pub async fn item_price_by_index(&self, index: usize) -> ComprarResult<String> {
        let result = self
            .interactor
            .read_text(&Locator::nth(ITEM_PRICE_CSS, index))
            .await;
        self.guarded(result).await
    }

    /// Description of the named item.
    pub async fn item_description_by_name(&self, name: &str) -> ComprarResult<String> {
        let locator = Locator::item_by_name(ITEM_NAME_CSS, name, ITEM_DESC_CSS);
        let result = self.interactor.read_text(&locator).await;
        self.guarded(result).await
    }

    /// Sum of all listed item prices, parsed as decimals.
    pub async fn total_price(&self) -> ComprarResult<f64> {
        let prices = self.item_prices().await?;
        let mut total = 0.0;
        for price in &prices {
            total += parse_price(price)?;
        }
        tracing::debug!(total, "computed cart total");
        Ok(total)
    }

    /// Remove every item. The list shifts on each removal, so the first
    /// item is removed repeatedly.
    pub async fn clear(&self) -> ComprarResult<()> {
        let count = self.item_count().await;
        for _ in 0..count {
            self.remove_item_by_index(0).await?;
            self.interactor.sleep(Duration::from_millis(100)).await;
        }
        tracing::info!("cleared cart");
        Ok(())
    }

    /// Whether the cart screen is the one currently displayed.
    pub async fn is_displayed(&self) -> bool {
        self.is_title_displayed().await && self.is_continue_shopping_displayed().await
    }
}

#[async_trait]
impl Page for CartPage {
    fn name(&self) -> &'static str {
        PAGE_NAME
    }

    async fn wait_until_loaded(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.page_title, None).await?;
        let _ = self
            .interactor
            .wait_visible(&self.continue_shopping_button, None)
            .await?;
        tracing::info!("cart page loaded");
        Ok(())
    }

    async fn verify_elements(&self) -> bool {
        let all_present = self.is_title_displayed().await
            && self.is_menu_button_displayed().await
            && self.is_continue_shopping_displayed().await
            && self.is_checkout_button_displayed().await;
        tracing::info!(all_present, "cart page element verification");
        all_present
    }
}
