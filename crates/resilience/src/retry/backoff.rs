//! Exponential backoff with optional jitter.

use bulwark_core::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, JITTER_FACTOR_MAX, JITTER_FACTOR_MIN,
};
use rand::Rng;
use std::time::Duration;

/// Delay to wait after the given zero-based attempt
///
/// The delay starts at `base_delay` and doubles per attempt. Doubling stops
/// as soon as the next value would exceed `max_delay`, so large attempt
/// numbers cannot overflow. With jitter, the clamped delay is scaled by a
/// uniform factor in `[0.5, 1.5)` and clamped again.
///
/// Zero `base_delay` and `max_delay` fall back to 100ms and 30s.
pub fn calculate_backoff(
    attempt: u32,
    base_delay: Duration,
    max_delay: Duration,
    use_jitter: bool,
) -> Duration {
    let base_delay = if base_delay.is_zero() {
        DEFAULT_BASE_DELAY
    } else {
        base_delay
    };
    let max_delay = if max_delay.is_zero() {
        DEFAULT_MAX_DELAY
    } else {
        max_delay
    };

    let mut delay = base_delay.min(max_delay);
    for _ in 0..attempt {
        match delay.checked_mul(2) {
            Some(next) if next <= max_delay => delay = next,
            _ => {
                delay = max_delay;
                break;
            }
        }
    }

    if use_jitter {
        let factor = rand::thread_rng().gen_range(JITTER_FACTOR_MIN..JITTER_FACTOR_MAX);
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
            .map_or(max_delay, |jittered| jittered.min(max_delay))
    } else {
        delay
    }
}
