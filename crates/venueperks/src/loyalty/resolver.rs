use super::domain::{Tier, TierLadder};
use serde::Serialize;

/// Outcome of resolving a visit count against a ladder.
///
/// `progress_percent` is the customer's linear progress from the current
/// band's threshold to the next band's, clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierResolution {
    pub current: Option<Tier>,
    pub next: Option<Tier>,
    pub progress_percent: f64,
}

impl TierResolution {
    fn none() -> Self {
        Self {
            current: None,
            next: None,
            progress_percent: 0.0,
        }
    }
}

impl TierLadder {
    /// Map a qualifying-visit count to the applicable band, the band after
    /// it, and progress between the two.
    ///
    /// This is the canonical selection policy, shared by the overview and
    /// payout paths. It is total: every input, including an empty or
    /// malformed ladder, yields a well-defined result.
    ///
    /// - Among bands containing `visit_count`, the highest `index` wins
    ///   (overlaps resolve in the customer's favor).
    /// - `next` is the cheapest band still out of reach, by `min_visits`.
    /// - A non-empty ladder with no match in either direction falls back to
    ///   pointing `next` at its first band.
    pub fn resolve(&self, visit_count: u32) -> TierResolution {
        if self.is_empty() {
            return TierResolution::none();
        }

        // Tiers are sorted ascending by index, so the last match has the
        // highest index.
        let current = self
            .tiers()
            .iter()
            .filter(|tier| tier.contains(visit_count))
            .last();

        let next = self
            .tiers()
            .iter()
            .filter(|tier| tier.min_visits > visit_count)
            .min_by_key(|tier| (tier.min_visits, tier.index));

        let next = match (current, next) {
            (None, None) => self.first(),
            (_, next) => next,
        };

        let progress_percent = progress(current, next, visit_count);

        TierResolution {
            current: current.cloned(),
            next: next.cloned(),
            progress_percent,
        }
    }
}

fn progress(current: Option<&Tier>, next: Option<&Tier>, visit_count: u32) -> f64 {
    match (current, next) {
        (None, None) => 0.0,
        (Some(_), None) => 100.0,
        (Some(current), Some(next)) => {
            let span = next.min_visits as f64 - current.min_visits as f64;
            if span <= 0.0 {
                // Malformed ladder; the thresholds give no usable gradient.
                return 0.0;
            }
            let gained = visit_count as f64 - current.min_visits as f64;
            (gained / span * 100.0).clamp(0.0, 100.0)
        }
        (None, Some(next)) => {
            if next.min_visits == 0 {
                return 0.0;
            }
            (visit_count as f64 / next.min_visits as f64 * 100.0).clamp(0.0, 100.0)
        }
    }
}
