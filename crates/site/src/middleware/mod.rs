//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID
//! 4. CSP nonce
//! 5. Security headers (reads the nonce set by the previous layer)
//! 6. Rate limiting on public form submissions (per route group)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::RequireAdmin;
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::form_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
