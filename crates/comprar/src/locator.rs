//! Locator abstraction for declarative element selection.
//!
//! A [`Locator`] describes how to find one or more elements on the current
//! page. Locators are immutable, embed no live state, and are resolved
//! against the live document on every call, never cached across
//! navigations.
//!
//! For the CDP backend each locator compiles to a JavaScript query
//! expression; the mock backend resolves the same variants structurally.

use serde::{Deserialize, Serialize};

/// A declarative rule for finding element(s) on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    /// Match by element id (`#id`)
    Id(String),
    /// Match by CSS selector
    Css(String),
    /// Match by class name (`.class`)
    ClassName(String),
    /// The Nth element matching a CSS selector (0-based)
    Nth {
        /// Base CSS selector
        css: String,
        /// 0-based index into the match list
        index: usize,
    },
    /// The target element inside the list item whose name text equals `name`.
    ///
    /// Used when a scenario identifies an item semantically ("add Sauce
    /// Labs Backpack to cart"): the item lists on the storefront render
    /// names and targets as parallel lists, so the target at the name's
    /// index is the one belonging to that item.
    ItemByName {
        /// CSS selector for the item name elements
        name_css: String,
        /// Exact display name to match
        name: String,
        /// CSS selector for the target elements (button, price, ...)
        target_css: String,
    },
}

impl Locator {
    /// Locator for an element id
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Locator for a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Locator for a class name
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::ClassName(name.into())
    }

    /// Positional variant: the Nth match of a CSS selector (0-based)
    #[must_use]
    pub fn nth(css: impl Into<String>, index: usize) -> Self {
        Self::Nth {
            css: css.into(),
            index,
        }
    }

    /// Name-based variant: `target_css` inside the item whose `name_css`
    /// text equals `name`
    #[must_use]
    pub fn item_by_name(
        name_css: impl Into<String>,
        name: impl Into<String>,
        target_css: impl Into<String>,
    ) -> Self {
        Self::ItemByName {
            name_css: name_css.into(),
            name: name.into(),
            target_css: target_css.into(),
        }
    }

    /// The base CSS selector this locator queries.
    ///
    /// For structural variants this is the selector of the *target* list.
    #[must_use]
    pub fn base_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Css(css) => css.clone(),
            Self::ClassName(name) => format!(".{name}"),
            Self::Nth { css, .. } => css.clone(),
            Self::ItemByName { target_css, .. } => target_css.clone(),
        }
    }

    /// Compile to a JavaScript expression yielding an array of matching
    /// elements, in document order.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Id(_) | Self::Css(_) | Self::ClassName(_) => {
                let css = self.base_css();
                format!("Array.from(document.querySelectorAll({css:?}))")
            }
            Self::Nth { css, index } => {
                format!(
                    "Array.from(document.querySelectorAll({css:?})).slice({index}, {index} + 1)"
                )
            }
            Self::ItemByName {
                name_css,
                name,
                target_css,
            } => {
                // Parallel-list resolution: index of the matching name
                // selects the target.
                format!(
                    "(() => {{ \
                     const i = Array.from(document.querySelectorAll({name_css:?}))\
                     .findIndex(el => el.textContent.trim() === {name:?}); \
                     if (i < 0) return []; \
                     return Array.from(document.querySelectorAll({target_css:?})).slice(i, i + 1); \
                     }})()"
                )
            }
        }
    }

    /// Compile to a JavaScript expression yielding the number of matches.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_query())
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Css(css) => write!(f, "{css}"),
            Self::ClassName(name) => write!(f, ".{name}"),
            Self::Nth { css, index } => write!(f, "{css}[{index}]"),
            Self::ItemByName {
                name_css,
                name,
                target_css,
            } => write!(f, "{target_css} in item '{name}' (by {name_css})"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_id_locator() {
            let locator = Locator::id("login-button");
            assert_eq!(locator.base_css(), "#login-button");
            assert_eq!(locator.to_string(), "#login-button");
        }

        #[test]
        fn test_class_locator() {
            let locator = Locator::class("shopping_cart_badge");
            assert_eq!(locator.base_css(), ".shopping_cart_badge");
        }

        #[test]
        fn test_css_locator() {
            let locator = Locator::css("h3[data-test='error']");
            assert_eq!(locator.base_css(), "h3[data-test='error']");
        }

        #[test]
        fn test_nth_locator() {
            let locator = Locator::nth(".btn_inventory", 2);
            assert_eq!(locator.base_css(), ".btn_inventory");
            assert_eq!(locator.to_string(), ".btn_inventory[2]");
        }

        #[test]
        fn test_item_by_name_locator() {
            let locator = Locator::item_by_name(
                ".inventory_item_name",
                "Sauce Labs Backpack",
                ".btn_inventory",
            );
            assert_eq!(locator.base_css(), ".btn_inventory");
            assert!(locator.to_string().contains("Sauce Labs Backpack"));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_simple_query() {
            let query = Locator::id("user-name").to_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.contains("#user-name"));
        }

        #[test]
        fn test_nth_query_slices() {
            let query = Locator::nth(".inventory_item", 1).to_query();
            assert!(query.contains("slice(1, 1 + 1)"));
        }

        #[test]
        fn test_item_by_name_query_uses_find_index() {
            let query = Locator::item_by_name(
                ".inventory_item_name",
                "Sauce Labs Bike Light",
                ".inventory_item_price",
            )
            .to_query();
            assert!(query.contains("findIndex"));
            assert!(query.contains("Sauce Labs Bike Light"));
            assert!(query.contains(".inventory_item_price"));
        }

        #[test]
        fn test_count_query_wraps_query() {
            let count = Locator::class("cart_item").to_count_query();
            assert!(count.ends_with(".length"));
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn test_locator_is_value_like() {
            // Repeated evaluation of the same locator renders identically.
            let locator = Locator::nth(".btn_inventory", 0);
            assert_eq!(locator.to_query(), locator.clone().to_query());
        }
    }
}
