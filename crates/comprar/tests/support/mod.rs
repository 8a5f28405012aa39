//! Scripted storefront running on the mock backend.
//!
//! Models just enough of the demo shop for end-to-end flows: credential
//! checking, a six-item catalog, cart state carried across screens, and
//! checkout form validation. Click and navigation handlers re-render the
//! document the way the real single-page app swaps screens.

use std::sync::{Arc, Mutex};

use comprar::mock::{MockBackend, MockDocument, MockElement};
use comprar::{ScenarioContext, Session, Settings};

pub const BASE_URL: &str = "https://shop.test/v1/";

pub const PASSWORD: &str = "secret_sauce";
pub const STANDARD_USER: &str = "standard_user";
pub const LOCKED_OUT_USER: &str = "locked_out_user";

pub const CATALOG: &[(&str, f64)] = &[
    ("Sauce Labs Backpack", 29.99),
    ("Sauce Labs Bike Light", 9.99),
    ("Sauce Labs Bolt T-Shirt", 15.99),
    ("Sauce Labs Fleece Jacket", 49.99),
    ("Sauce Labs Onesie", 7.99),
    ("Test.allTheThings() T-Shirt (Red)", 15.99),
];

const TAX_RATE: f64 = 0.08;

#[derive(Debug, Default)]
struct AppState {
    cart: Vec<usize>,
}

fn price_text(amount: f64) -> String {
    format!("${amount:.2}")
}

fn render_chrome(doc: &mut MockDocument, cart_len: usize) {
    doc.insert_one(".shopping_cart_link", MockElement::default());
    doc.insert_one(".bm-burger-button", MockElement::default());
    if cart_len > 0 {
        doc.insert_one(".shopping_cart_badge", MockElement::text(cart_len.to_string()));
    } else {
        doc.remove(".shopping_cart_badge");
    }
}

fn render_login(doc: &mut MockDocument) {
    doc.clear();
    doc.set_url(BASE_URL);
    doc.set_title("Swag Labs");
    doc.insert_one("#user-name", MockElement::default().attr("placeholder", "Username"));
    doc.insert_one("#password", MockElement::default().attr("placeholder", "Password"));
    doc.insert_one("#login-button", MockElement::default().attr("value", "LOGIN"));
    doc.insert_one(".login_logo", MockElement::text("Swag Labs"));
    doc.insert_one(".bot_column", MockElement::default());
    doc.set_ready(true);
}

fn render_login_error(doc: &mut MockDocument, message: &str) {
    doc.insert_one("h3[data-test='error']", MockElement::text(message));
    doc.insert_one(".error-button", MockElement::text("x"));
}

fn render_inventory(doc: &mut MockDocument, state: &AppState) {
    doc.clear();
    doc.set_url("https://shop.test/inventory.html");
    doc.set_title("Swag Labs");
    doc.insert_one(".title", MockElement::text("Products"));
    doc.insert_one(".product_sort_container", MockElement::text("Name (A to Z)"));
    render_chrome(doc, state.cart.len());

    doc.insert(
        ".inventory_item",
        CATALOG.iter().map(|_| MockElement::default()).collect(),
    );
    doc.insert(
        ".inventory_item_name",
        CATALOG.iter().map(|(name, _)| MockElement::text(*name)).collect(),
    );
    doc.insert(
        ".inventory_item_price",
        CATALOG
            .iter()
            .map(|(_, price)| MockElement::text(price_text(*price)))
            .collect(),
    );
    doc.insert(
        ".inventory_item_desc",
        CATALOG
            .iter()
            .map(|(name, _)| MockElement::text(format!("A fine {name}")))
            .collect(),
    );
    doc.insert(
        ".btn_inventory",
        (0..CATALOG.len())
            .map(|i| {
                if state.cart.contains(&i) {
                    MockElement::text("REMOVE")
                } else {
                    MockElement::text("ADD TO CART")
                }
            })
            .collect(),
    );
    doc.set_ready(true);
}

fn render_cart(doc: &mut MockDocument, state: &AppState) {
    doc.clear();
    doc.set_url("https://shop.test/cart.html");
    doc.set_title("Swag Labs");
    doc.insert_one(".title", MockElement::text("Your Cart"));
    doc.insert_one("#continue-shopping", MockElement::text("Continue Shopping"));
    doc.insert_one("#checkout", MockElement::text("CHECKOUT"));
    render_chrome(doc, state.cart.len());

    doc.insert(
        ".cart_item",
        state.cart.iter().map(|_| MockElement::default()).collect(),
    );
    doc.insert(
        ".inventory_item_name",
        state
            .cart
            .iter()
            .map(|&i| MockElement::text(CATALOG[i].0))
            .collect(),
    );
    doc.insert(
        ".inventory_item_price",
        state
            .cart
            .iter()
            .map(|&i| MockElement::text(price_text(CATALOG[i].1)))
            .collect(),
    );
    doc.insert(
        ".btn_secondary",
        state.cart.iter().map(|_| MockElement::text("REMOVE")).collect(),
    );
    doc.set_ready(true);
}

fn render_checkout_info(doc: &mut MockDocument, state: &AppState) {
    doc.clear();
    doc.set_url("https://shop.test/checkout-step-one.html");
    doc.set_title("Swag Labs");
    doc.insert_one(".title", MockElement::text("Checkout: Your Information"));
    doc.insert_one("#first-name", MockElement::default().attr("placeholder", "First Name"));
    doc.insert_one("#last-name", MockElement::default().attr("placeholder", "Last Name"));
    doc.insert_one("#postal-code", MockElement::default().attr("placeholder", "Zip/Postal Code"));
    doc.insert_one("#continue", MockElement::text("CONTINUE"));
    doc.insert_one("#cancel", MockElement::text("CANCEL"));
    render_chrome(doc, state.cart.len());
    doc.set_ready(true);
}

fn render_overview(doc: &mut MockDocument, state: &AppState) {
    doc.clear();
    doc.set_url("https://shop.test/checkout-step-two.html");
    doc.set_title("Swag Labs");
    doc.insert_one(".title", MockElement::text("Checkout: Overview"));
    doc.insert_one("#finish", MockElement::text("FINISH"));
    doc.insert_one("#cancel", MockElement::text("CANCEL"));
    render_chrome(doc, state.cart.len());

    doc.insert(
        ".cart_item",
        state.cart.iter().map(|_| MockElement::default()).collect(),
    );
    doc.insert(
        ".inventory_item_name",
        state
            .cart
            .iter()
            .map(|&i| MockElement::text(CATALOG[i].0))
            .collect(),
    );
    doc.insert(
        ".inventory_item_price",
        state
            .cart
            .iter()
            .map(|&i| MockElement::text(price_text(CATALOG[i].1)))
            .collect(),
    );

    let subtotal: f64 = state.cart.iter().map(|&i| CATALOG[i].1).sum();
    let tax = (subtotal * TAX_RATE * 100.0).round() / 100.0;
    doc.insert_one(
        ".summary_subtotal_label",
        MockElement::text(format!("Item total: ${subtotal:.2}")),
    );
    doc.insert_one(".summary_tax_label", MockElement::text(format!("Tax: ${tax:.2}")));
    doc.insert_one(
        ".summary_total_label",
        MockElement::text(format!("Total: ${:.2}", subtotal + tax)),
    );
    doc.set_ready(true);
}

fn render_complete(doc: &mut MockDocument) {
    doc.clear();
    doc.set_url("https://shop.test/checkout-complete.html");
    doc.set_title("Swag Labs");
    doc.insert_one(".title", MockElement::text("Finish"));
    doc.insert_one(".complete-header", MockElement::text("THANK YOU FOR YOUR ORDER"));
    doc.insert_one(
        ".complete-text",
        MockElement::text("Your order has been dispatched, and will arrive just as fast as the pony can get there!"),
    );
    doc.insert_one(".pony_express", MockElement::default());
    doc.insert_one("#back-to-products", MockElement::text("BACK HOME"));
    render_chrome(doc, 0);
    doc.set_ready(true);
}

fn field_value(doc: &MockDocument, css: &str) -> String {
    doc.get(css)
        .and_then(|list| list.first())
        .and_then(|el| el.attributes.get("value"))
        .cloned()
        .unwrap_or_default()
}

/// Install the scripted storefront onto a mock backend.
pub async fn install(backend: &MockBackend) {
    let state = Arc::new(Mutex::new(AppState::default()));

    backend
        .on_navigate({
            let state = Arc::clone(&state);
            move |doc, url| {
                let state = state.lock().unwrap();
                if url.contains("/inventory.html") {
                    render_inventory(doc, &state);
                } else if url.contains("/cart.html") {
                    render_cart(doc, &state);
                } else {
                    render_login(doc);
                }
            }
        })
        .await;

    backend
        .on_click("#login-button", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let username = field_value(doc, "#user-name");
                let password = field_value(doc, "#password");
                let state = state.lock().unwrap();
                if password != PASSWORD {
                    render_login_error(doc, "Epic sadface: Username and password do not match any user in this service");
                } else if username == LOCKED_OUT_USER {
                    render_login_error(doc, "Epic sadface: Sorry, this user has been locked out.");
                } else if username == STANDARD_USER
                    || username == "problem_user"
                    || username == "performance_glitch_user"
                {
                    render_inventory(doc, &state);
                } else {
                    render_login_error(doc, "Epic sadface: Username and password do not match any user in this service");
                }
            }
        })
        .await;

    backend
        .on_click(".error-button", |doc, _| {
            doc.remove("h3[data-test='error']");
            doc.remove(".error-button");
        })
        .await;

    backend
        .on_click(".btn_inventory", {
            let state = Arc::clone(&state);
            move |doc, index| {
                let mut state = state.lock().unwrap();
                if let Some(pos) = state.cart.iter().position(|&i| i == index) {
                    let _ = state.cart.remove(pos);
                } else {
                    state.cart.push(index);
                }
                render_inventory(doc, &state);
            }
        })
        .await;

    backend
        .on_click(".shopping_cart_link", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let state = state.lock().unwrap();
                render_cart(doc, &state);
            }
        })
        .await;

    backend
        .on_click("#continue-shopping", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let state = state.lock().unwrap();
                render_inventory(doc, &state);
            }
        })
        .await;

    backend
        .on_click(".btn_secondary", {
            let state = Arc::clone(&state);
            move |doc, index| {
                let mut state = state.lock().unwrap();
                if index < state.cart.len() {
                    let _ = state.cart.remove(index);
                }
                render_cart(doc, &state);
            }
        })
        .await;

    backend
        .on_click("#checkout", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let state = state.lock().unwrap();
                render_checkout_info(doc, &state);
            }
        })
        .await;

    backend
        .on_click("#continue", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let first = field_value(doc, "#first-name");
                let last = field_value(doc, "#last-name");
                let postal = field_value(doc, "#postal-code");
                if first.is_empty() {
                    doc.insert_one("h3[data-test='error']", MockElement::text("Error: First Name is required"));
                } else if last.is_empty() {
                    doc.insert_one("h3[data-test='error']", MockElement::text("Error: Last Name is required"));
                } else if postal.is_empty() {
                    doc.insert_one("h3[data-test='error']", MockElement::text("Error: Postal Code is required"));
                } else {
                    let state = state.lock().unwrap();
                    render_overview(doc, &state);
                }
            }
        })
        .await;

    backend
        .on_click("#finish", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let mut state = state.lock().unwrap();
                state.cart.clear();
                render_complete(doc);
            }
        })
        .await;

    backend
        .on_click("#back-to-products", {
            let state = Arc::clone(&state);
            move |doc, _| {
                let state = state.lock().unwrap();
                render_inventory(doc, &state);
            }
        })
        .await;
}

/// A scenario context over a fresh scripted storefront, already navigated
/// to the login screen.
pub async fn boot() -> (ScenarioContext, MockBackend) {
    let backend = MockBackend::new();
    install(&backend).await;

    let mut settings = Settings::defaults();
    settings.set("base_url", BASE_URL);
    settings.set("explicit_wait_secs", "1");
    settings.set("page_load_timeout_secs", "1");
    settings.set("screenshot_on_failure", "false");

    let session = Session::from_backend(Arc::new(backend.clone()));
    let ctx = ScenarioContext::new(session, Arc::new(settings));
    ctx.session()
        .backend()
        .navigate(BASE_URL)
        .await
        .expect("navigate to storefront");
    (ctx, backend)
}
