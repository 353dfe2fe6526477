//! Fixed-point payout math over basis points.

use super::domain::Tier;

/// Compute the cash reward, in cents, for one receipt.
///
/// No tier means no payout. Otherwise the reward is the tier's percentage of
/// the receipt, rounded half away from zero on the fractional cent, bounded
/// by the per-business cap when one is configured. The math runs in 128 bits
/// so no realistic receipt can overflow, and a `percent_bps` above 10000 is
/// passed through rather than rejected.
pub fn compute_payout(tier: Option<&Tier>, receipt_cents: u64, cap_cents: Option<u64>) -> u64 {
    let Some(tier) = tier else {
        return 0;
    };

    // Inputs are non-negative, so round-half-up equals round half away from
    // zero here.
    let numerator = u128::from(receipt_cents) * u128::from(tier.percent_bps) + 5_000;
    let raw = u64::try_from(numerator / 10_000).unwrap_or(u64::MAX);

    match cap_cents {
        Some(cap) => raw.min(cap),
        None => raw,
    }
}
