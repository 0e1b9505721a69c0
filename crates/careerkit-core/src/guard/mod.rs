//! Request throttling.

pub mod rate_limit;

pub use rate_limit::{CountingPolicy, RateDecision, RateLimitGuard, RateLimitPolicy};
