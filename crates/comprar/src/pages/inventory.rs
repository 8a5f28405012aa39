//! Product inventory screen.

use async_trait::async_trait;

use super::{element_displayed, guard, Page};
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::screenshot::ScreenshotSink;
use crate::wait::Interactor;

const PAGE_NAME: &str = "InventoryPage";

const ITEM_NAME_CSS: &str = ".inventory_item_name";
const ITEM_BUTTON_CSS: &str = ".btn_inventory";
const ITEM_PRICE_CSS: &str = ".inventory_item_price";
const ITEM_DESC_CSS: &str = ".inventory_item_desc";

/// Page object for the inventory screen.
#[derive(Debug, Clone)]
pub struct InventoryPage {
    interactor: Interactor,
    sink: ScreenshotSink,
    page_title: Locator,
    cart_link: Locator,
    cart_badge: Locator,
    menu_button: Locator,
    sort_select: Locator,
    items: Locator,
    item_names: Locator,
    item_prices: Locator,
    item_descriptions: Locator,
}

impl InventoryPage {
    /// Build the page over a shared interactable session.
    #[must_use]
    pub fn new(interactor: Interactor, sink: ScreenshotSink) -> Self {
        Self {
            interactor,
            sink,
            page_title: Locator::class("title"),
            cart_link: Locator::class("shopping_cart_link"),
            cart_badge: Locator::class("shopping_cart_badge"),
            menu_button: Locator::css(".bm-burger-button"),
            sort_select: Locator::class("product_sort_container"),
            items: Locator::class("inventory_item"),
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

    /// Open the cart screen.
    pub async fn open_cart(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.cart_link).await;
        tracing::info!("opened cart");
        self.guarded(result).await
    }

    /// Whether the cart link is on screen.
    pub async fn is_cart_link_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.cart_link).await
    }

    /// Number shown on the cart badge; `0` when the badge is absent,
    /// which is how an empty cart renders.
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

    /// Raw badge text, for scenarios asserting the exact rendering.
    pub async fn cart_badge_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.cart_badge).await;
        self.guarded(result).await
    }

    /// Whether the cart badge is on screen.
    pub async fn is_cart_badge_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.cart_badge).await
    }

    /// Open the burger menu.
    pub async fn open_menu(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.menu_button).await;
        self.guarded(result).await
    }

    /// Whether the burger menu button is on screen.
    pub async fn is_menu_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.menu_button).await
    }

    /// Select a sort option by its visible label.
    pub async fn select_sort_option(&self, label: &str) -> ComprarResult<()> {
        let result = self.interactor.select_by_label(&self.sort_select, label).await;
        tracing::info!(label, "selected sort option");
        self.guarded(result).await
    }

    /// Currently selected sort option text.
    pub async fn current_sort_option(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.sort_select).await;
        self.guarded(result).await
    }

    /// Sort products by name, A to Z.
    pub async fn sort_by_name_ascending(&self) -> ComprarResult<()> {
        self.select_sort_option("Name (A to Z)").await
    }

    /// Sort products by name, Z to A.
    pub async fn sort_by_name_descending(&self) -> ComprarResult<()> {
        self.select_sort_option("Name (Z to A)").await
    }

    /// Sort products by price, low to high.
    pub async fn sort_by_price_ascending(&self) -> ComprarResult<()> {
        self.select_sort_option("Price (low to high)").await
    }

    /// Sort products by price, high to low.
    pub async fn sort_by_price_descending(&self) -> ComprarResult<()> {
        self.select_sort_option("Price (high to low)").await
    }

    /// Number of product cards currently visible.
    pub async fn item_count(&self) -> usize {
        match self.interactor.visible_count(&self.items).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "item count probe failed");
                0
            }
        }
    }

    /// All product names, in display order.
    pub async fn product_names(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_names, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// All product prices, in display order.
    pub async fn product_prices(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_prices, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// All product descriptions, in display order.
    pub async fn product_descriptions(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_descriptions, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    fn button_by_name(name: &str) -> Locator {
        Locator::item_by_name(ITEM_NAME_CSS, name, ITEM_BUTTON_CSS)
    }

    fn button_by_index(index: usize) -> Locator {
        Locator::nth(ITEM_BUTTON_CSS, index)
    }

    /// Add a product to the cart by its display name.
    pub async fn add_to_cart_by_name(&self, name: &str) -> ComprarResult<()> {
        let result = self.interactor.click(&Self::button_by_name(name)).await;
        tracing::info!(product = name, "added product to cart");
        self.guarded(result).await
    }

    /// Add the Nth product (0-based) to the cart.
    pub async fn add_to_cart_by_index(&self, index: usize) -> ComprarResult<()> {
        let result = self.interactor.click(&Self::button_by_index(index)).await;
        tracing::info!(index, "added product to cart");
        self.guarded(result).await
    }

    /// Remove a product from the cart by its display name. The storefront
    /// renders add and remove as the same toggling button.
    pub async fn remove_from_cart_by_name(&self, name: &str) -> ComprarResult<()> {
        let result = self.interactor.click(&Self::button_by_name(name)).await;
        tracing::info!(product = name, "removed product from cart");
        self.guarded(result).await
    }

    /// Remove the Nth product (0-based) from the cart.
    pub async fn remove_from_cart_by_index(&self, index: usize) -> ComprarResult<()> {
        let result = self.interactor.click(&Self::button_by_index(index)).await;
        tracing::info!(index, "removed product from cart");
        self.guarded(result).await
    }

    /// Open a product's detail view by clicking its name.
    pub async fn open_product_by_name(&self, name: &str) -> ComprarResult<()> {
        let locator = Locator::item_by_name(ITEM_NAME_CSS, name, ITEM_NAME_CSS);
        let result = self.interactor.click(&locator).await;
        self.guarded(result).await
    }

    /// Open the Nth product's detail view (0-based).
    pub async fn open_product_by_index(&self, index: usize) -> ComprarResult<()> {
        let result = self
            .interactor
            .click(&Locator::nth(ITEM_NAME_CSS, index))
            .await;
        self.guarded(result).await
    }

    /// Cart-toggle button caption for a product, by display name.
    pub async fn button_text_by_name(&self, name: &str) -> ComprarResult<String> {
        let result = self.interactor.read_text(&Self::button_by_name(name)).await;
        self.guarded(result).await
    }

    /// Cart-toggle button caption for the Nth product (0-based).
    pub async fn button_text_by_index(&self, index: usize) -> ComprarResult<String> {
        let result = self.interactor.read_text(&Self::button_by_index(index)).await;
        self.guarded(result).await
    }

    /// Whether the named product is in the cart, judged by its toggle
    /// button reading "remove" (case-insensitive).
    pub async fn is_product_in_cart(&self, name: &str) -> ComprarResult<bool> {
        let text = self.button_text_by_name(name).await?;
        Ok(text.eq_ignore_ascii_case("remove"))
    }

    /// Whether the Nth product (0-based) is in the cart.
    pub async fn is_product_in_cart_by_index(&self, index: usize) -> ComprarResult<bool> {
        let text = self.button_text_by_index(index).await?;
        Ok(text.eq_ignore_ascii_case("remove"))
    }

    /// Whether the inventory screen is the one currently displayed.
    pub async fn is_displayed(&self) -> bool {
        let on_inventory_url = match self.interactor.backend().current_url().await {
            Ok(url) => url.contains("/inventory.html"),
            Err(e) => {
                tracing::warn!(error = %e, "url probe failed");
                return false;
            }
        };
        on_inventory_url
            && self.is_cart_link_displayed().await
            && self.is_menu_button_displayed().await
            && element_displayed(&self.interactor, &self.sort_select).await
            && self.item_count().await > 0
    }
}

#[async_trait]
impl Page for InventoryPage {
    fn name(&self) -> &'static str {
        PAGE_NAME
    }

    async fn wait_until_loaded(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.page_title, None).await?;
        let _ = self.interactor.wait_visible(&self.cart_link, None).await?;
        let _ = self.interactor.wait_visible(&self.sort_select, None).await?;
        tracing::info!("inventory page loaded");
        Ok(())
    }

    async fn verify_elements(&self) -> bool {
        let all_present = self.is_title_displayed().await
            && self.is_cart_link_displayed().await
            && self.is_menu_button_displayed().await
            && element_displayed(&self.interactor, &self.sort_select).await
            && self.item_count().await > 0;
        tracing::info!(all_present, "inventory page element verification");
        all_present
    }
}
