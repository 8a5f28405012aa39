//! Checkout screens: information form, order overview, completion.
//!
//! The storefront renders checkout as three stages sharing a header and
//! cancel control, so one page object covers the whole flow, with
//! stage-specific load and identity checks.

use async_trait::async_trait;

use super::{element_displayed, element_enabled, guard, parse_price, Page};
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};
use crate::screenshot::ScreenshotSink;
use crate::wait::Interactor;

const PAGE_NAME: &str = "CheckoutPage";

const ITEM_CSS: &str = ".cart_item";
const ITEM_NAME_CSS: &str = ".inventory_item_name";
const ITEM_PRICE_CSS: &str = ".inventory_item_price";

const SUBTOTAL_PREFIX: &str = "Item total: $";
const TAX_PREFIX: &str = "Tax: $";
const TOTAL_PREFIX: &str = "Total: $";

/// Page object for the three checkout stages.
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    interactor: Interactor,
    sink: ScreenshotSink,
    page_title: Locator,
    menu_button: Locator,
    cancel_button: Locator,
    continue_button: Locator,
    finish_button: Locator,
    back_to_products_button: Locator,
    first_name_field: Locator,
    last_name_field: Locator,
    postal_code_field: Locator,
    error_message: Locator,
    checkout_items: Locator,
    item_names: Locator,
    item_prices: Locator,
    subtotal_label: Locator,
    tax_label: Locator,
    total_label: Locator,
    complete_header: Locator,
    complete_text: Locator,
    pony_express_image: Locator,
}

impl CheckoutPage {
    /// Build the page over a shared interactable session.
    #[must_use]
    pub fn new(interactor: Interactor, sink: ScreenshotSink) -> Self {
        Self {
            interactor,
            sink,
            page_title: Locator::class("title"),
            menu_button: Locator::css(".bm-burger-button"),
            cancel_button: Locator::id("cancel"),
            continue_button: Locator::id("continue"),
            finish_button: Locator::id("finish"),
            back_to_products_button: Locator::id("back-to-products"),
            first_name_field: Locator::id("first-name"),
            last_name_field: Locator::id("last-name"),
            postal_code_field: Locator::id("postal-code"),
            error_message: Locator::css("h3[data-test='error']"),
            checkout_items: Locator::css(ITEM_CSS),
            item_names: Locator::css(ITEM_NAME_CSS),
            item_prices: Locator::css(ITEM_PRICE_CSS),
            subtotal_label: Locator::class("summary_subtotal_label"),
            tax_label: Locator::class("summary_tax_label"),
            total_label: Locator::class("summary_total_label"),
            complete_header: Locator::class("complete-header"),
            complete_text: Locator::class("complete-text"),
            pony_express_image: Locator::class("pony_express"),
        }
    }

    async fn guarded<T>(&self, result: ComprarResult<T>) -> ComprarResult<T> {
        guard(&self.interactor, &self.sink, PAGE_NAME, result).await
    }

    // =========================================================================
    // Shared controls
    // =========================================================================

    /// Header title text.
    pub async fn title_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.page_title).await;
        self.guarded(result).await
    }

    /// Abort checkout.
    pub async fn cancel(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.cancel_button).await;
        tracing::info!("cancelled checkout");
        self.guarded(result).await
    }

    /// Whether the cancel button is on screen.
    pub async fn is_cancel_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.cancel_button).await
    }

    // =========================================================================
    // Information form
    // =========================================================================

    /// Type the first name, replacing any prior content.
    pub async fn enter_first_name(&self, first_name: &str) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.first_name_field, first_name).await;
        tracing::info!(first_name, "entered first name");
        self.guarded(result).await
    }

    /// Type the last name, replacing any prior content.
    pub async fn enter_last_name(&self, last_name: &str) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.last_name_field, last_name).await;
        tracing::info!(last_name, "entered last name");
        self.guarded(result).await
    }

    /// Type the postal code, replacing any prior content.
    pub async fn enter_postal_code(&self, postal_code: &str) -> ComprarResult<()> {
        let result = self
            .interactor
            .type_text(&self.postal_code_field, postal_code)
            .await;
        tracing::info!(postal_code, "entered postal code");
        self.guarded(result).await
    }

    /// Fill the whole information form.
    pub async fn fill_information(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> ComprarResult<()> {
        self.enter_first_name(first_name).await?;
        self.enter_last_name(last_name).await?;
        self.enter_postal_code(postal_code).await
    }

    /// Current value of the first-name field.
    pub async fn first_name(&self) -> ComprarResult<String> {
        let result = self
            .interactor
            .read_attribute(&self.first_name_field, "value")
            .await
            .map(Option::unwrap_or_default);
        self.guarded(result).await
    }

    /// Current value of the last-name field.
    pub async fn last_name(&self) -> ComprarResult<String> {
        let result = self
            .interactor
            .read_attribute(&self.last_name_field, "value")
            .await
            .map(Option::unwrap_or_default);
        self.guarded(result).await
    }

    /// Current value of the postal-code field.
    pub async fn postal_code(&self) -> ComprarResult<String> {
        let result = self
            .interactor
            .read_attribute(&self.postal_code_field, "value")
            .await
            .map(Option::unwrap_or_default);
        self.guarded(result).await
    }

    /// Submit the information form.
    pub async fn continue_to_overview(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.continue_button).await;
        tracing::info!("continued to overview");
        self.guarded(result).await
    }

    /// Whether the continue button is on screen.
    pub async fn is_continue_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.continue_button).await
    }

    /// Whether the continue button is enabled.
    pub async fn is_continue_button_enabled(&self) -> bool {
        element_enabled(&self.interactor, &self.continue_button).await
    }

    /// Text of the validation error banner.
    pub async fn error_message(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.error_message).await;
        self.guarded(result).await
    }

    /// Whether the validation error banner is on screen.
    pub async fn is_error_message_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.error_message).await
    }

    /// Whether the information form is the screen currently displayed.
    pub async fn is_information_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.first_name_field).await
            && element_displayed(&self.interactor, &self.last_name_field).await
            && element_displayed(&self.interactor, &self.postal_code_field).await
    }

    /// Block until the information form's fields are visible.
    pub async fn wait_for_information(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.first_name_field, None).await?;
        let _ = self.interactor.wait_visible(&self.last_name_field, None).await?;
        let _ = self.interactor.wait_visible(&self.postal_code_field, None).await?;
        tracing::info!("checkout information page loaded");
        Ok(())
    }

    /// AND of the information form's element-presence checks.
    pub async fn verify_information_elements(&self) -> bool {
        let all_present = element_displayed(&self.interactor, &self.page_title).await
            && element_displayed(&self.interactor, &self.menu_button).await
            && self.is_information_displayed().await
            && self.is_continue_button_displayed().await
            && self.is_cancel_button_displayed().await;
        tracing::info!(all_present, "checkout information element verification");
        all_present
    }

    // =========================================================================
    // Order overview
    // =========================================================================

    /// Number of line items in the overview.
    pub async fn item_count(&self) -> usize {
        match self.interactor.visible_count(&self.checkout_items).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "overview item count probe failed");
                0
            }
        }
    }

    /// All overview item names, in display order.
    pub async fn item_names(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_names, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// All overview item prices, in display order.
    pub async fn item_prices(&self) -> ComprarResult<Vec<String>> {
        let result = self
            .interactor
            .wait_all_visible(&self.item_prices, None)
            .await
            .map(|snapshots| snapshots.into_iter().map(|s| s.text).collect());
        self.guarded(result).await
    }

    /// Raw subtotal label text.
    pub async fn subtotal_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.subtotal_label).await;
        self.guarded(result).await
    }

    /// Raw tax label text.
    pub async fn tax_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.tax_label).await;
        self.guarded(result).await
    }

    /// Raw total label text.
    pub async fn total_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.total_label).await;
        self.guarded(result).await
    }

    fn parse_labeled_amount(text: &str, prefix: &str) -> ComprarResult<f64> {
        let amount = text
            .strip_prefix(prefix)
            .ok_or_else(|| ComprarError::Interaction {
                message: format!("unexpected summary label '{text}'"),
            })?;
        parse_price(amount)
    }

    /// Subtotal amount parsed from its label.
    pub async fn subtotal_amount(&self) -> ComprarResult<f64> {
        let text = self.subtotal_text().await?;
        Self::parse_labeled_amount(&text, SUBTOTAL_PREFIX)
    }

    /// Tax amount parsed from its label.
    pub async fn tax_amount(&self) -> ComprarResult<f64> {
        let text = self.tax_text().await?;
        Self::parse_labeled_amount(&text, TAX_PREFIX)
    }

    /// Total amount parsed from its label.
    pub async fn total_amount(&self) -> ComprarResult<f64> {
        let text = self.total_text().await?;
        Self::parse_labeled_amount(&text, TOTAL_PREFIX)
    }

    /// Place the order.
    pub async fn finish(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.finish_button).await;
        tracing::info!("finished checkout");
        self.guarded(result).await
    }

    /// Whether the finish button is on screen.
    pub async fn is_finish_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.finish_button).await
    }

    /// Whether the finish button is enabled.
    pub async fn is_finish_button_enabled(&self) -> bool {
        element_enabled(&self.interactor, &self.finish_button).await
    }

    /// Whether the order overview is the screen currently displayed.
    pub async fn is_overview_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.subtotal_label).await
            && element_displayed(&self.interactor, &self.tax_label).await
            && element_displayed(&self.interactor, &self.total_label).await
    }

    /// Block until the overview's summary labels are visible.
    pub async fn wait_for_overview(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.subtotal_label, None).await?;
        let _ = self.interactor.wait_visible(&self.tax_label, None).await?;
        let _ = self.interactor.wait_visible(&self.total_label, None).await?;
        tracing::info!("checkout overview page loaded");
        Ok(())
    }

    /// AND of the overview's element-presence checks.
    pub async fn verify_overview_elements(&self) -> bool {
        let all_present = element_displayed(&self.interactor, &self.page_title).await
            && self.is_overview_displayed().await
            && self.is_finish_button_displayed().await
            && self.is_cancel_button_displayed().await
            && self.item_count().await > 0;
        tracing::info!(all_present, "checkout overview element verification");
        all_present
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Confirmation header text.
    pub async fn complete_header(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.complete_header).await;
        self.guarded(result).await
    }

    /// Confirmation body text.
    pub async fn complete_text(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.complete_text).await;
        self.guarded(result).await
    }

    /// Whether the confirmation header is on screen.
    pub async fn is_complete_header_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.complete_header).await
    }

    /// Whether the pony-express artwork is on screen.
    pub async fn is_pony_express_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.pony_express_image).await
    }

    /// Return to the inventory after completing an order.
    pub async fn back_to_products(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.back_to_products_button).await;
        self.guarded(result).await
    }

    /// Whether the order has been placed and confirmed.
    pub async fn is_complete(&self) -> bool {
        self.is_complete_header_displayed().await
            && element_displayed(&self.interactor, &self.complete_text).await
            && self.is_pony_express_displayed().await
    }

    /// Whether the completion screen is the one currently displayed.
    pub async fn is_complete_displayed(&self) -> bool {
        self.is_complete_header_displayed().await
            && element_displayed(&self.interactor, &self.complete_text).await
    }

    /// Block until the completion screen's elements are visible.
    pub async fn wait_for_complete(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.complete_header, None).await?;
        let _ = self.interactor.wait_visible(&self.complete_text, None).await?;
        let _ = self
            .interactor
            .wait_visible(&self.pony_express_image, None)
            .await?;
        tracing::info!("checkout complete page loaded");
        Ok(())
    }

    /// AND of the completion screen's element-presence checks.
    pub async fn verify_complete_elements(&self) -> bool {
        let all_present = self.is_complete().await
            && element_displayed(&self.interactor, &self.back_to_products_button).await;
        tracing::info!(all_present, "checkout complete element verification");
        all_present
    }
}

#[async_trait]
impl Page for CheckoutPage {
    fn name(&self) -> &'static str {
        PAGE_NAME
    }

    async fn wait_until_loaded(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.page_title, None).await?;
        tracing::info!("checkout page loaded");
        Ok(())
    }

    async fn verify_elements(&self) -> bool {
        // Whichever stage is on screen must verify; checkout has no single
        // element set valid across all three.
        self.verify_information_elements().await
            || self.verify_overview_elements().await
            || self.verify_complete_elements().await
    }
}
