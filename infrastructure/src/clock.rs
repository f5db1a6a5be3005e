//! System clock adapter.

use agora_application::ports::clock::Clock;
use chrono::{DateTime, Utc};

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
