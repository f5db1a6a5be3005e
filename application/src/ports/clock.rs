//! Clock port.
//!
//! Vote windows are pure arithmetic over `now`; injecting the clock keeps
//! expiry behaviour testable without sleeping.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
