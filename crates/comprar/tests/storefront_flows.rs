//! End-to-end flows against the scripted storefront.

mod support;

use comprar::pages::Page;
use support::{boot, CATALOG, LOCKED_OUT_USER, PASSWORD, STANDARD_USER};

#[tokio::test]
async fn standard_user_reaches_inventory() {
    let (ctx, _backend) = boot().await;

    assert!(ctx.login().is_displayed().await);
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    assert!(ctx.inventory().is_displayed().await);
    assert!(ctx.inventory().item_count().await > 0);
}

#[tokio::test]
async fn locked_out_user_stays_on_login_with_error() {
    let (ctx, _backend) = boot().await;

    ctx.login()
        .login(LOCKED_OUT_USER, PASSWORD)
        .await
        .expect("submit credentials");

    assert!(ctx.login().is_displayed().await);
    assert!(ctx.login().is_error_message_displayed().await);
    let message = ctx.login().error_message().await.expect("error text");
    assert!(message.contains("locked out"), "unexpected error: {message}");
}

#[tokio::test]
async fn wrong_password_shows_mismatch_error() {
    let (ctx, _backend) = boot().await;

    ctx.login()
        .login(STANDARD_USER, "wrong_sauce")
        .await
        .expect("submit credentials");

    assert!(ctx.login().is_displayed().await);
    let message = ctx.login().error_message().await.expect("error text");
    assert!(message.contains("do not match"));
}

#[tokio::test]
async fn adding_two_products_by_index_sets_badge_to_two() {
    let (ctx, _backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    assert_eq!(ctx.inventory().cart_badge_count().await, 0);

    ctx.inventory().add_to_cart_by_index(0).await.expect("add first");
    ctx.inventory().add_to_cart_by_index(1).await.expect("add second");

    assert_eq!(ctx.inventory().cart_badge_text().await.expect("badge"), "2");
    assert_eq!(ctx.inventory().cart_badge_count().await, 2);
    assert!(ctx.inventory().is_product_in_cart_by_index(0).await.expect("in cart"));
    assert!(ctx.inventory().is_product_in_cart_by_index(1).await.expect("in cart"));
}

#[tokio::test]
async fn single_item_cart_total_matches_listed_price() {
    let (ctx, _backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    let listed = ctx.inventory().product_prices().await.expect("prices")[0].clone();
    ctx.inventory().add_to_cart_by_index(0).await.expect("add");
    ctx.inventory().open_cart().await.expect("open cart");

    ctx.cart().wait_until_loaded().await.expect("cart loaded");
    assert_eq!(ctx.cart().item_count().await, 1);

    let listed_amount: f64 = listed.trim_start_matches('$').parse().expect("price");
    let total = ctx.cart().total_price().await.expect("total");
    assert!(
        (total - listed_amount).abs() < 1e-9,
        "total {total} != listed {listed_amount}"
    );
}

#[tokio::test]
async fn add_by_name_then_remove_in_cart() {
    let (ctx, _backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    let (name, _) = CATALOG[2];
    ctx.inventory()
        .add_to_cart_by_name(name)
        .await
        .expect("add by name");
    assert!(ctx.inventory().is_product_in_cart(name).await.expect("in cart"));

    ctx.inventory().open_cart().await.expect("open cart");
    assert!(ctx.cart().contains_item(name).await);

    ctx.cart().remove_item_by_name(name).await.expect("remove");
    assert!(ctx.cart().is_empty().await);
    assert_eq!(ctx.cart().cart_badge_count().await, 0);
}

#[tokio::test]
async fn empty_first_name_keeps_checkout_information_with_error() {
    let (ctx, _backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    ctx.inventory().add_to_cart_by_index(0).await.expect("add");
    ctx.inventory().open_cart().await.expect("open cart");
    ctx.cart().open_checkout().await.expect("checkout");
    ctx.checkout()
        .wait_for_information()
        .await
        .expect("information form");

    ctx.checkout().enter_first_name("").await.expect("empty first name");
    ctx.checkout().enter_last_name("Doe").await.expect("last name");
    ctx.checkout().enter_postal_code("12345").await.expect("postal");
    ctx.checkout().continue_to_overview().await.expect("continue");

    assert!(ctx.checkout().is_information_displayed().await);
    assert!(ctx.checkout().is_error_message_displayed().await);
    let message = ctx.checkout().error_message().await.expect("error text");
    assert!(message.contains("First Name is required"));
}

#[tokio::test]
async fn full_checkout_flow_completes_and_empties_cart() {
    let (ctx, _backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    ctx.inventory().add_to_cart_by_index(0).await.expect("add first");
    ctx.inventory().add_to_cart_by_index(4).await.expect("add onesie");
    ctx.inventory().open_cart().await.expect("open cart");
    ctx.cart().open_checkout().await.expect("checkout");

    ctx.checkout()
        .fill_information("John", "Doe", "12345")
        .await
        .expect("fill information");
    // Round trip through the form fields.
    assert_eq!(ctx.checkout().first_name().await.expect("first name"), "John");

    ctx.checkout().continue_to_overview().await.expect("continue");
    ctx.checkout().wait_for_overview().await.expect("overview");

    let expected_subtotal = CATALOG[0].1 + CATALOG[4].1;
    let subtotal = ctx.checkout().subtotal_amount().await.expect("subtotal");
    assert!((subtotal - expected_subtotal).abs() < 1e-9);

    let tax = ctx.checkout().tax_amount().await.expect("tax");
    let total = ctx.checkout().total_amount().await.expect("total");
    assert!((total - (subtotal + tax)).abs() < 1e-9);

    ctx.checkout().finish().await.expect("finish");
    ctx.checkout().wait_for_complete().await.expect("complete page");
    assert!(ctx.checkout().is_complete().await);
    let header = ctx.checkout().complete_header().await.expect("header");
    assert_eq!(header, "THANK YOU FOR YOUR ORDER");

    ctx.checkout().back_to_products().await.expect("back to products");
    assert!(ctx.inventory().is_displayed().await);
    assert_eq!(ctx.inventory().cart_badge_count().await, 0);
}

#[tokio::test]
async fn verify_elements_identifies_each_screen() {
    let (ctx, _backend) = boot().await;

    assert!(ctx.login().verify_elements().await);

    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");
    assert!(ctx.inventory().verify_elements().await);

    ctx.inventory().open_cart().await.expect("open cart");
    assert!(ctx.cart().verify_elements().await);
}

#[tokio::test]
async fn teardown_closes_session_and_reports_diagnostics() {
    let (ctx, backend) = boot().await;
    ctx.login()
        .login(STANDARD_USER, PASSWORD)
        .await
        .expect("login");

    let diagnostics = comprar::after_scenario(&ctx, "diagnostics probe", true).await;
    assert_eq!(
        diagnostics.url.as_deref(),
        Some("https://shop.test/inventory.html")
    );
    assert_eq!(diagnostics.title.as_deref(), Some("Swag Labs"));
    assert!(backend.is_closed().await);
}
