//! Login steps.

use cucumber::{given, then, when};

use crate::world::StorefrontWorld;

#[given("I am on the login page")]
async fn on_login_page(world: &mut StorefrontWorld) {
    assert!(
        world.ctx().login().is_displayed().await,
        "login page should be displayed"
    );
}

#[when(expr = "I enter username {string}")]
async fn enter_username(world: &mut StorefrontWorld, username: String) {
    world
        .ctx()
        .login()
        .enter_username(&username)
        .await
        .expect("enter username");
}

#[when(expr = "I enter password {string}")]
async fn enter_password(world: &mut StorefrontWorld, password: String) {
    world
        .ctx()
        .login()
        .enter_password(&password)
        .await
        .expect("enter password");
}

#[when("I click the login button")]
async fn click_login(world: &mut StorefrontWorld) {
    world.ctx().login().click_login().await.expect("click login");
}

#[when(expr = "I login with valid credentials {string}")]
async fn login_as(world: &mut StorefrontWorld, username: String) {
    let password = world.ctx().settings().password().to_string();
    world
        .ctx()
        .login()
        .login(&username, &password)
        .await
        .expect("login");
}

#[then("I should be redirected to the inventory page")]
async fn redirected_to_inventory(world: &mut StorefrontWorld) {
    assert!(
        world.ctx().inventory().is_displayed().await,
        "inventory page should be displayed"
    );
}

#[then("I should see an error message")]
async fn error_visible(world: &mut StorefrontWorld) {
    // Login and checkout render the same error banner element.
    assert!(
        world.ctx().login().is_error_message_displayed().await,
        "error message should be displayed"
    );
}

#[then(expr = "the error message should contain {string}")]
async fn error_contains(world: &mut StorefrontWorld, expected: String) {
    let message = world
        .ctx()
        .login()
        .error_message()
        .await
        .expect("read error message");
    assert!(
        message.contains(&expected),
        "error '{message}' should contain '{expected}'"
    );
}

#[then("I should see the username field")]
async fn username_field_visible(world: &mut StorefrontWorld) {
    assert!(world.ctx().login().is_username_field_displayed().await);
}

#[then("I should see the password field")]
async fn password_field_visible(world: &mut StorefrontWorld) {
    assert!(world.ctx().login().is_password_field_displayed().await);
}

#[then("I should see the login button")]
async fn login_button_visible(world: &mut StorefrontWorld) {
    assert!(world.ctx().login().is_login_button_displayed().await);
}

#[then("the login button should be enabled")]
async fn login_button_enabled(world: &mut StorefrontWorld) {
    assert!(world.ctx().login().is_login_button_enabled().await);
}
