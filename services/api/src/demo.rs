use crate::infra::{sample_ladder, seed_directory, InMemoryDirectory};
use chrono::{Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use venueperks::error::AppError;
use venueperks::loyalty::{
    compute_payout, parse_cents, BusinessId, LoyaltyOverview, LoyaltyService, LoyaltyServiceError,
    PatronId, PayoutQuote, Tier, TierLadder, VisitCountRequest,
};

#[derive(Args, Debug)]
pub(crate) struct PayoutArgs {
    /// Visit count to resolve against, inclusive of the triggering visit
    #[arg(long)]
    pub(crate) visits: u32,
    /// Receipt total as a decimal amount, e.g. 24.50
    #[arg(long)]
    pub(crate) receipt: String,
    /// Optional per-visit cap as a decimal amount
    #[arg(long)]
    pub(crate) cap: Option<String>,
    /// Ladder JSON file (array of tier records); defaults to the sample ladder
    #[arg(long)]
    pub(crate) ladder: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Prior ledger visits inside the window before the demo receipt
    #[arg(long, default_value_t = 4)]
    pub(crate) visits: u32,
    /// Receipt total for the settlement portion of the demo
    #[arg(long, default_value = "23.75")]
    pub(crate) receipt: String,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            visits: 4,
            receipt: "23.75".to_string(),
        }
    }
}

pub(crate) fn run_payout_quote(args: PayoutArgs) -> Result<(), AppError> {
    let PayoutArgs {
        visits,
        receipt,
        cap,
        ladder,
    } = args;

    let ladder = match ladder {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let records: Vec<Tier> = serde_json::from_str(&raw)?;
            TierLadder::from_records(records)
        }
        None => sample_ladder(),
    };

    let receipt_cents = non_negative_cents(&receipt)?;
    let cap_cents = cap.as_deref().map(non_negative_cents).transpose()?;

    let resolution = ladder.resolve(visits);
    let payout_cents = compute_payout(resolution.current.as_ref(), receipt_cents, cap_cents);

    render_ladder(&ladder);
    println!();
    println!("visits (inclusive): {visits}");
    match &resolution.current {
        Some(tier) => println!("current tier:       {tier}"),
        None => println!("current tier:       none"),
    }
    match &resolution.next {
        Some(tier) => println!("next tier:          {tier}"),
        None => println!("next tier:          none (top of ladder)"),
    }
    println!("progress:           {:.1}%", resolution.progress_percent);
    println!("receipt:            {}", format_cents(receipt_cents));
    if let Some(cap) = cap_cents {
        println!("per-visit cap:      {}", format_cents(cap));
    }
    println!("payout:             {}", format_cents(payout_cents));

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { visits, receipt } = args;

    let directory = Arc::new(InMemoryDirectory::default());
    seed_directory(&directory, 30);

    let business = BusinessId("biz-fieldnote".to_string());
    let patron = PatronId("patron-demo".to_string());
    let now = Utc::now();
    for day in 0..visits {
        directory.record_visit(&business, &patron, now - Duration::days(i64::from(day) + 1));
    }

    let service = LoyaltyService::new(directory);
    let request = VisitCountRequest {
        patron: Some(patron),
        visits: None,
    };

    let overview = service.overview(&business, &request, now)?;
    render_overview(&overview);

    let quote = service.quote_amount(&business, &request, &receipt, now)?;
    println!();
    render_quote(&quote);

    Ok(())
}

fn non_negative_cents(raw: &str) -> Result<u64, AppError> {
    let cents = parse_cents(raw)?;
    u64::try_from(cents)
        .map_err(|_| LoyaltyServiceError::NegativeReceipt(raw.to_string()).into())
}

fn render_ladder(ladder: &TierLadder) {
    println!("== Loyalty Ladder ==");
    if ladder.is_empty() {
        println!("  (no loyalty program configured)");
        return;
    }
    for tier in ladder.tiers() {
        let label = tier.label.as_deref().unwrap_or("-");
        println!("  {tier}  {label}");
    }
    for issue in ladder.audit() {
        println!("  ! {issue}");
    }
}

fn render_overview(overview: &LoyaltyOverview) {
    println!("== {} ==", overview.business_name);
    if let Some(locality) = &overview.locality {
        println!("  {locality}");
    }
    println!(
        "  {} qualifying visit(s) in the last {} days",
        overview.qualifying_visits, overview.window_days
    );
    match &overview.current_tier {
        Some(tier) => println!("  current: {tier}"),
        None => println!("  current: none yet"),
    }
    match &overview.next_tier {
        Some(tier) => println!(
            "  next:    {tier} ({:.1}% of the way there)",
            overview.progress_to_next_percent
        ),
        None => println!("  next:    top of the ladder"),
    }
}

fn render_quote(quote: &PayoutQuote) {
    println!("== Receipt Settlement ==");
    println!("  receipt: {}", format_cents(quote.receipt_cents));
    match &quote.tier {
        Some(tier) => println!("  tier:    {tier}"),
        None => println!("  tier:    none"),
    }
    if let Some(cap) = quote.cap_cents {
        println!("  cap:     {}", format_cents(cap));
    }
    println!("  payout:  {}", format_cents(quote.payout_cents));
}

fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cents_renders_dollars_and_cents() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(7), "$0.07");
        assert_eq!(format_cents(2_450), "$24.50");
    }

    #[test]
    fn payout_quote_runs_against_the_sample_ladder() {
        let args = PayoutArgs {
            visits: 5,
            receipt: "19.90".to_string(),
            cap: Some("1.50".to_string()),
            ladder: None,
        };
        run_payout_quote(args).expect("quote renders");
    }

    #[test]
    fn demo_walkthrough_completes() {
        run_demo(DemoArgs::default()).expect("demo renders");
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let result = non_negative_cents("-3.00");
        assert!(result.is_err());
    }
}
