//! Minimum perceived latency.
//!
//! A request may declare an additional timeout: the shortest time a caller
//! should observe between starting a request and receiving its success.
//! Fast responses are held back for the remainder.

use std::time::Duration;

/// Delay still owed before delivering a success.
///
/// Zero when the attempt already took at least `additional`.
pub fn remaining_delay(additional: Duration, elapsed: Duration) -> Duration {
    additional.saturating_sub(elapsed)
}
