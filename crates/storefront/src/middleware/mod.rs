//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (read or generate `x-request-id`, echo it back)
//! 4. CORS (configured front-end origin)
//! 5. Rate limiting (write endpoints only)

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::write_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
