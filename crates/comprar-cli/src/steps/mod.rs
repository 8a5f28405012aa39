//! Step definitions.
//!
//! Steps are pure dispatch: parse parameters, call into the appropriate
//! page object, assert a post-condition. They never reach into the
//! synchronization layer or the backend directly.
//!
//! Button-text comparisons are case-insensitive throughout; the
//! storefront styles captions in uppercase while scenarios write them in
//! title case.

pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod login;
