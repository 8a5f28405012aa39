//! Login screen.

use std::sync::Arc;

use async_trait::async_trait;

use super::{element_displayed, element_enabled, guard, Page};
use crate::config::Settings;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::screenshot::ScreenshotSink;
use crate::wait::Interactor;

const PAGE_NAME: &str = "LoginPage";

/// Page object for the login screen.
#[derive(Debug, Clone)]
pub struct LoginPage {
    interactor: Interactor,
    sink: ScreenshotSink,
    settings: Arc<Settings>,
    username_field: Locator,
    password_field: Locator,
    login_button: Locator,
    login_logo: Locator,
    bot_image: Locator,
    error_message: Locator,
    error_close_button: Locator,
}

impl LoginPage {
    /// Build the page over a shared interactable session.
    #[must_use]
    pub fn new(interactor: Interactor, sink: ScreenshotSink, settings: Arc<Settings>) -> Self {
        Self {
            interactor,
            sink,
            settings,
            username_field: Locator::id("user-name"),
            password_field: Locator::id("password"),
            login_button: Locator::id("login-button"),
            login_logo: Locator::class("login_logo"),
            bot_image: Locator::class("bot_column"),
            error_message: Locator::css("h3[data-test='error']"),
            error_close_button: Locator::class("error-button"),
        }
    }

    async fn guarded<T>(&self, result: ComprarResult<T>) -> ComprarResult<T> {
        guard(&self.interactor, &self.sink, PAGE_NAME, result).await
    }

    /// Navigate to the application's login screen.
    pub async fn open(&self) -> ComprarResult<()> {
        let url = self.settings.base_url().to_string();
        self.interactor.backend().navigate(&url).await?;
        self.interactor.wait_for_document_ready().await?;
        tracing::info!(url = %url, "opened login page");
        Ok(())
    }

    /// Type the username, replacing any prior content.
    pub async fn enter_username(&self, username: &str) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.username_field, username).await;
        tracing::info!(username, "entered username");
        self.guarded(result).await
    }

    /// Type the password, replacing any prior content.
    pub async fn enter_password(&self, password: &str) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.password_field, password).await;
        tracing::info!("entered password");
        self.guarded(result).await
    }

    /// Click the login button.
    pub async fn click_login(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.login_button).await;
        self.guarded(result).await
    }

    /// Submit the given credentials.
    pub async fn login(&self, username: &str, password: &str) -> ComprarResult<()> {
        self.enter_username(username).await?;
        self.enter_password(password).await?;
        self.click_login().await?;
        tracing::info!(username, "submitted login");
        Ok(())
    }

    /// Log in with the configured standard user.
    pub async fn login_standard_user(&self) -> ComprarResult<()> {
        let (user, pass) = (
            self.settings.standard_user().to_string(),
            self.settings.password().to_string(),
        );
        self.login(&user, &pass).await
    }

    /// Log in with the configured locked-out user.
    pub async fn login_locked_out_user(&self) -> ComprarResult<()> {
        let (user, pass) = (
            self.settings.locked_out_user().to_string(),
            self.settings.password().to_string(),
        );
        self.login(&user, &pass).await
    }

    /// Log in with the configured problem user.
    pub async fn login_problem_user(&self) -> ComprarResult<()> {
        let (user, pass) = (
            self.settings.problem_user().to_string(),
            self.settings.password().to_string(),
        );
        self.login(&user, &pass).await
    }

    /// Log in with the configured performance-glitch user.
    pub async fn login_performance_glitch_user(&self) -> ComprarResult<()> {
        let (user, pass) = (
            self.settings.performance_glitch_user().to_string(),
            self.settings.password().to_string(),
        );
        self.login(&user, &pass).await
    }

    /// Text of the error banner.
    pub async fn error_message(&self) -> ComprarResult<String> {
        let result = self.interactor.read_text(&self.error_message).await;
        self.guarded(result).await
    }

    /// Whether the error banner is on screen.
    pub async fn is_error_message_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.error_message).await
    }

    /// Dismiss the error banner.
    pub async fn close_error_message(&self) -> ComprarResult<()> {
        let result = self.interactor.click(&self.error_close_button).await;
        self.guarded(result).await
    }

    /// Whether the login button is enabled.
    pub async fn is_login_button_enabled(&self) -> bool {
        element_enabled(&self.interactor, &self.login_button).await
    }

    /// Login button caption.
    pub async fn login_button_text(&self) -> ComprarResult<String> {
        // The login control renders its caption in the `value` attribute.
        let result = self
            .interactor
            .read_attribute(&self.login_button, "value")
            .await
            .map(Option::unwrap_or_default);
        self.guarded(result).await
    }

    /// Whether the username field is on screen.
    pub async fn is_username_field_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.username_field).await
    }

    /// Whether the password field is on screen.
    pub async fn is_password_field_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.password_field).await
    }

    /// Whether the login button is on screen.
    pub async fn is_login_button_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.login_button).await
    }

    /// Whether the logo is on screen.
    pub async fn is_login_logo_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.login_logo).await
    }

    /// Whether the bot artwork is on screen.
    pub async fn is_bot_image_displayed(&self) -> bool {
        element_displayed(&self.interactor, &self.bot_image).await
    }

    /// Clear the username field.
    pub async fn clear_username(&self) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.username_field, "").await;
        self.guarded(result).await
    }

    /// Clear the password field.
    pub async fn clear_password(&self) -> ComprarResult<()> {
        let result = self.interactor.type_text(&self.password_field, "").await;
        self.guarded(result).await
    }

    /// Placeholder text of the username field.
    pub async fn username_placeholder(&self) -> ComprarResult<Option<String>> {
        let result = self
            .interactor
            .read_attribute(&self.username_field, "placeholder")
            .await;
        self.guarded(result).await
    }

    /// Placeholder text of the password field.
    pub async fn password_placeholder(&self) -> ComprarResult<Option<String>> {
        let result = self
            .interactor
            .read_attribute(&self.password_field, "placeholder")
            .await;
        self.guarded(result).await
    }

    /// Whether the login screen is the one currently displayed.
    pub async fn is_displayed(&self) -> bool {
        self.is_username_field_displayed().await
            && self.is_password_field_displayed().await
            && self.is_login_button_displayed().await
    }
}

#[async_trait]
impl Page for LoginPage {
    fn name(&self) -> &'static str {
        PAGE_NAME
    }

    async fn wait_until_loaded(&self) -> ComprarResult<()> {
        self.interactor.wait_for_document_ready().await?;
        let _ = self.interactor.wait_visible(&self.username_field, None).await?;
        let _ = self.interactor.wait_visible(&self.password_field, None).await?;
        let _ = self.interactor.wait_visible(&self.login_button, None).await?;
        tracing::info!("login page loaded");
        Ok(())
    }

    async fn verify_elements(&self) -> bool {
        let all_present = self.is_username_field_displayed().await
            && self.is_password_field_displayed().await
            && self.is_login_button_enabled().await
            && self.is_login_logo_displayed().await
            && self.is_bot_image_displayed().await;
        tracing::info!(all_present, "login page element verification");
        all_present
    }
}
