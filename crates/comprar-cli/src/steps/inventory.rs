//! Inventory steps.

use cucumber::{given, then, when};

use crate::world::StorefrontWorld;

#[given(expr = "I am logged in as {string}")]
async fn logged_in_as(world: &mut StorefrontWorld, username: String) {
    let password = world.ctx().settings().password().to_string();
    world
        .ctx()
        .login()
        .login(&username, &password)
        .await
        .expect("login");
    assert!(
        world.ctx().inventory().is_displayed().await,
        "should land on the inventory page"
    );
}

#[given("I am on the inventory page")]
async fn on_inventory_page(world: &mut StorefrontWorld) {
    assert!(
        world.ctx().inventory().is_displayed().await,
        "inventory page should be displayed"
    );
}

#[when("I add the first product to cart")]
async fn add_first_product(world: &mut StorefrontWorld) {
    world
        .ctx()
        .inventory()
        .add_to_cart_by_index(0)
        .await
        .expect("add first product");
}

#[when("I add the second product to cart")]
async fn add_second_product(world: &mut StorefrontWorld) {
    world
        .ctx()
        .inventory()
        .add_to_cart_by_index(1)
        .await
        .expect("add second product");
}

#[when("I add the third product to cart")]
async fn add_third_product(world: &mut StorefrontWorld) {
    world
        .ctx()
        .inventory()
        .add_to_cart_by_index(2)
        .await
        .expect("add third product");
}

#[when(expr = "I add {string} to cart")]
async fn add_product_by_name(world: &mut StorefrontWorld, name: String) {
    world
        .ctx()
        .inventory()
        .add_to_cart_by_name(&name)
        .await
        .expect("add product by name");
}

#[when("I click on the shopping cart icon")]
async fn open_cart(world: &mut StorefrontWorld) {
    world.ctx().inventory().open_cart().await.expect("open cart");
}

#[then("I should see multiple product items")]
async fn multiple_products_listed(world: &mut StorefrontWorld) {
    let count = world.ctx().inventory().item_count().await;
    assert!(count > 0, "expected products on the inventory page");
}

#[then("each product should have a name, price, and add to cart button")]
async fn products_have_name_price_button(world: &mut StorefrontWorld) {
    let inventory = world.ctx().inventory();
    let names = inventory.product_names().await.expect("product names");
    let prices = inventory.product_prices().await.expect("product prices");
    let first_button = inventory.button_text_by_index(0).await.expect("button text");

    assert!(!names.is_empty() && !names[0].is_empty());
    assert_eq!(names.len(), prices.len());
    assert!(!first_button.is_empty());
}

#[then(expr = "the cart badge should show {string}")]
async fn cart_badge_shows(world: &mut StorefrontWorld, expected: String) {
    let expected: u32 = expected.parse().expect("numeric badge expectation");
    assert_eq!(world.ctx().inventory().cart_badge_count().await, expected);
}

#[then(expr = "the add to cart button should change to {string}")]
async fn first_button_changed_to(world: &mut StorefrontWorld, expected: String) {
    let actual = world
        .ctx()
        .inventory()
        .button_text_by_index(0)
        .await
        .expect("button text");
    assert!(
        actual.eq_ignore_ascii_case(&expected),
        "button reads '{actual}', expected '{expected}'"
    );
}

#[then(expr = "all three products should show {string} button")]
async fn first_three_buttons_show(world: &mut StorefrontWorld, expected: String) {
    for index in 0..3 {
        let actual = world
            .ctx()
            .inventory()
            .button_text_by_index(index)
            .await
            .expect("button text");
        assert!(
            actual.eq_ignore_ascii_case(&expected),
            "button {index} reads '{actual}', expected '{expected}'"
        );
    }
}
