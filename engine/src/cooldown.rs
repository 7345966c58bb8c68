//! Time gate shared by the daily, weekly, and work claims.

/// Outcome of a cooldown check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    pub eligible: bool,
    /// Earliest timestamp at which the next claim succeeds.
    pub next_eligible_ms: u64,
}

/// A claim is eligible once a full window has elapsed since the last one.
///
/// `last_ms == 0` means the claim has never been made and is always eligible,
/// so a freshly created account can claim immediately.
pub fn check_cooldown(last_ms: u64, window_ms: u64, now_ms: u64) -> Cooldown {
    let next_eligible_ms = last_ms.saturating_add(window_ms);
    Cooldown {
        eligible: last_ms == 0 || now_ms >= next_eligible_ms,
        next_eligible_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildmint_types::economy::DAILY_COOLDOWN_MS;

    #[test]
    fn test_never_claimed_is_always_eligible() {
        let check = check_cooldown(0, DAILY_COOLDOWN_MS, 1);
        assert!(check.eligible);
    }

    #[test]
    fn test_rejects_inside_window() {
        let check = check_cooldown(1_000, DAILY_COOLDOWN_MS, 1_000 + DAILY_COOLDOWN_MS - 1);
        assert!(!check.eligible);
        assert_eq!(check.next_eligible_ms, 1_000 + DAILY_COOLDOWN_MS);
    }

    #[test]
    fn test_eligible_exactly_at_window_boundary() {
        let check = check_cooldown(1_000, DAILY_COOLDOWN_MS, 1_000 + DAILY_COOLDOWN_MS);
        assert!(check.eligible);
    }

    #[test]
    fn test_window_overflow_saturates() {
        let check = check_cooldown(10, u64::MAX, 500);
        assert!(!check.eligible);
        assert_eq!(check.next_eligible_ms, u64::MAX);
    }
}
