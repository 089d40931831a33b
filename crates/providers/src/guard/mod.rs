//! Request guards.
//!
//! In-memory, per-key state consulted by callers before any expensive work:
//! - [`RateLimiter`]: fixed-window admission per client key
//! - [`TtlCache`]: memoized responses with lazy expiry
//!
//! Both are explicitly constructed instances; nothing here is global.

mod rate_limiter;
mod ttl_cache;

pub use rate_limiter::{RateDecision, RateLimiter};
pub use ttl_cache::TtlCache;
