//! Flower Shop Storefront library.
//!
//! This crate provides the JSON API server as a library, allowing it to be
//! tested and reused by the CLI (migrations, seeding).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
