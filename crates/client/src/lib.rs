//! Flower Shop client library.
//!
//! Everything a front end needs on its side of the wire:
//!
//! - [`cart`] - the shopping cart, persisted to a local storage slot and
//!   published to subscribers after every change
//! - [`forum`] - per-category state of the forum page (loading, drafts, messages)
//! - [`api`] - async client for the storefront JSON API
//!
//! The cart and forum board are synchronous and single-owner; only the API
//! client performs network I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod forum;

pub use api::{ApiError, ContactOutcome, ShopClient};
pub use cart::{CART_SLOT, CartLine, CartStore, FileStorage, MemoryStorage, SlotStorage, SubscriptionId};
pub use forum::{ForumBoard, LoadStatus};
