//! Checkout steps.

use cucumber::{given, then, when};

use crate::world::StorefrontWorld;

#[given("I am on the checkout information page")]
async fn on_checkout_information(world: &mut StorefrontWorld) {
    let ctx = world.ctx();
    ctx.inventory()
        .add_to_cart_by_index(0)
        .await
        .expect("add product");
    ctx.inventory().open_cart().await.expect("open cart");
    ctx.cart().open_checkout().await.expect("open checkout");
    ctx.checkout()
        .wait_for_information()
        .await
        .expect("information form load");
}

#[when(expr = "I enter first name {string}")]
async fn enter_first_name(world: &mut StorefrontWorld, first_name: String) {
    world
        .ctx()
        .checkout()
        .enter_first_name(&first_name)
        .await
        .expect("enter first name");
}

#[when(expr = "I enter last name {string}")]
async fn enter_last_name(world: &mut StorefrontWorld, last_name: String) {
    world
        .ctx()
        .checkout()
        .enter_last_name(&last_name)
        .await
        .expect("enter last name");
}

#[when(expr = "I enter postal code {string}")]
async fn enter_postal_code(world: &mut StorefrontWorld, postal_code: String) {
    world
        .ctx()
        .checkout()
        .enter_postal_code(&postal_code)
        .await
        .expect("enter postal code");
}

#[when(expr = "I enter checkout information {string} {string} {string}")]
async fn enter_checkout_information(
    world: &mut StorefrontWorld,
    first_name: String,
    last_name: String,
    postal_code: String,
) {
    world
        .ctx()
        .checkout()
        .fill_information(&first_name, &last_name, &postal_code)
        .await
        .expect("fill checkout information");
}

#[when("I try to proceed with empty fields")]
async fn proceed_with_empty_fields(world: &mut StorefrontWorld) {
    let checkout = world.ctx().checkout();
    checkout.enter_first_name("").await.expect("clear first name");
    checkout.enter_last_name("").await.expect("clear last name");
    checkout.enter_postal_code("").await.expect("clear postal code");
    checkout
        .continue_to_overview()
        .await
        .expect("click continue");
}

#[then("I should be redirected to the checkout information page")]
async fn redirected_to_information(world: &mut StorefrontWorld) {
    assert!(
        world.ctx().checkout().is_information_displayed().await,
        "checkout information page should be displayed"
    );
}

#[then("I should remain on the checkout information page")]
async fn remained_on_information(world: &mut StorefrontWorld) {
    assert!(
        world.ctx().checkout().is_information_displayed().await,
        "should still be on the checkout information page"
    );
}

#[then("I should see the checkout overview page")]
async fn overview_displayed(world: &mut StorefrontWorld) {
    world
        .ctx()
        .checkout()
        .wait_for_overview()
        .await
        .expect("overview load");
    assert!(world.ctx().checkout().is_overview_displayed().await);
}

#[then("the order summary totals should be consistent")]
async fn totals_consistent(world: &mut StorefrontWorld) {
    let checkout = world.ctx().checkout();
    let subtotal = checkout.subtotal_amount().await.expect("subtotal");
    let tax = checkout.tax_amount().await.expect("tax");
    let total = checkout.total_amount().await.expect("total");
    assert!(
        (subtotal + tax - total).abs() < 0.01,
        "subtotal {subtotal} + tax {tax} != total {total}"
    );
}

#[then("I should see the order confirmation page")]
async fn confirmation_displayed(world: &mut StorefrontWorld) {
    world
        .ctx()
        .checkout()
        .wait_for_complete()
        .await
        .expect("completion page load");
    assert!(world.ctx().checkout().is_complete().await);
}

#[then(expr = "I should see {string} message")]
async fn confirmation_message_is(world: &mut StorefrontWorld, expected: String) {
    let header = world
        .ctx()
        .checkout()
        .complete_header()
        .await
        .expect("confirmation header");
    assert!(
        header.eq_ignore_ascii_case(&expected),
        "header '{header}', expected '{expected}'"
    );
}
