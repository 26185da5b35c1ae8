//! Outbound services used by the storefront.
//!
//! # Services
//!
//! - `email` - Contact form delivery over SMTP

pub mod email;
