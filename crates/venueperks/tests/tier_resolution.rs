use venueperks::loyalty::{compute_payout, parse_cents, parse_cents_lenient, Tier, TierLadder};

fn tier(index: u32, min: u32, max: Option<u32>, bps: u32, label: &str) -> Tier {
    Tier {
        index,
        min_visits: min,
        max_visits: max,
        percent_bps: bps,
        label: Some(label.to_string()),
    }
}

fn taproom_ladder() -> TierLadder {
    TierLadder::from_records(vec![
        tier(1, 3, Some(4), 700, "Regular"),
        tier(0, 1, Some(2), 500, "Newcomer"),
        tier(2, 5, None, 1000, "Local Legend"),
    ])
}

#[test]
fn ladder_canonicalizes_storage_order() {
    let ladder = taproom_ladder();
    let labels: Vec<&str> = ladder
        .tiers()
        .iter()
        .map(|t| t.label.as_deref().expect("labels set"))
        .collect();
    assert_eq!(labels, vec!["Newcomer", "Regular", "Local Legend"]);
}

#[test]
fn second_visit_sits_halfway_to_the_regular_tier() {
    let resolution = taproom_ladder().resolve(2);
    let current = resolution.current.expect("newcomer band applies");
    assert_eq!(current.index, 0);
    assert_eq!(current.percent_bps, 500);
    let next = resolution.next.expect("regular band is ahead");
    assert_eq!(next.min_visits, 3);
    assert_eq!(resolution.progress_percent, 50.0);
}

#[test]
fn zero_visits_have_everything_ahead_of_them() {
    let resolution = taproom_ladder().resolve(0);
    assert!(resolution.current.is_none());
    assert_eq!(resolution.next.expect("first band ahead").index, 0);
    assert_eq!(resolution.progress_percent, 0.0);
}

#[test]
fn fifth_visit_unlocks_the_open_ended_top_band() {
    let resolution = taproom_ladder().resolve(5);
    let current = resolution.current.expect("top band applies");
    assert_eq!(current.index, 2);
    assert_eq!(current.percent_bps, 1000);
    assert!(resolution.next.is_none());
    assert_eq!(resolution.progress_percent, 100.0);
}

#[test]
fn empty_ladder_means_no_program_and_no_payout() {
    let resolution = TierLadder::empty().resolve(7);
    assert!(resolution.current.is_none());
    assert!(resolution.next.is_none());
    assert_eq!(resolution.progress_percent, 0.0);
    assert_eq!(compute_payout(resolution.current.as_ref(), 10_000, None), 0);
}

#[test]
fn resolution_and_payout_compose_for_a_receipt() {
    let resolution = taproom_ladder().resolve(5);
    // 10% of a $19.90 tab.
    let payout = compute_payout(resolution.current.as_ref(), 1_990, None);
    assert_eq!(payout, 199);
    // A $1.50 cap bounds the same receipt.
    let capped = compute_payout(resolution.current.as_ref(), 1_990, Some(150));
    assert_eq!(capped, 150);
}

#[test]
fn currency_helpers_match_documented_behavior() {
    assert_eq!(parse_cents("19.995").expect("valid amount"), 2_000);
    assert_eq!(parse_cents_lenient("abc"), 0);
    assert!(parse_cents("abc").is_err());
}
