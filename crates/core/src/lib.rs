//! Flower Shop Core - Shared domain types.
//!
//! This crate provides the types shared by every Flower Shop component:
//! - `storefront` - JSON API server backed by `PostgreSQL`
//! - `client` - Cart store, forum board state and API client
//! - `cli` - Command-line tools for migrations, browsing and the cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! on both sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`catalog`] - Products, categories and catalog queries
//! - [`forum`] - Forum posts and categories
//! - [`contact`] - Contact form submissions
//! - [`validation`] - Validation error shared by request types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod contact;
pub mod forum;
pub mod types;
pub mod validation;

pub use catalog::{
    Category, NewCategory, NewProduct, Product, ProductQuery, ProductType, SortKey,
    ValidCategory, ValidProduct,
};
pub use contact::{ContactReceipt, ContactRequest, ContactStatus, ValidContact};
pub use forum::{ForumCategory, ForumPost, NewForumPost};
pub use types::*;
pub use validation::ValidationError;
