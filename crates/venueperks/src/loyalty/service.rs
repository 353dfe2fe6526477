use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::directory::{BusinessDirectory, BusinessId, BusinessProgram, DirectoryError, PatronId};
use super::domain::Tier;
use super::money::{parse_cents, MoneyError};
use super::payout::compute_payout;

/// Service composing the directory seam, tier resolver, and payout math.
pub struct LoyaltyService<D> {
    directory: Arc<D>,
}

/// UI-facing snapshot of where a patron stands on a business's ladder.
#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyOverview {
    pub business_id: BusinessId,
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    pub window_days: u32,
    pub qualifying_visits: u32,
    pub current_tier: Option<Tier>,
    pub next_tier: Option<Tier>,
    pub tiers: Vec<Tier>,
    pub progress_to_next_percent: f64,
}

/// Settlement-time answer: which band applied and what the receipt pays out.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutQuote {
    pub business_id: BusinessId,
    /// Visit count used for tier selection, inclusive of the triggering visit.
    pub qualifying_visits: u32,
    pub receipt_cents: u64,
    pub tier: Option<Tier>,
    pub payout_cents: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_cents: Option<u64>,
}

/// How the caller identifies the patron's standing for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct VisitCountRequest {
    pub patron: Option<PatronId>,
    /// Explicit override; when present the ledger is not consulted.
    pub visits: Option<u32>,
}

impl<D> LoyaltyService<D>
where
    D: BusinessDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Resolve the UI-facing tier/progress snapshot for a business.
    pub fn overview(
        &self,
        business: &BusinessId,
        request: &VisitCountRequest,
        as_of: DateTime<Utc>,
    ) -> Result<LoyaltyOverview, LoyaltyServiceError> {
        let program = self.program(business)?;
        let visits = self.visit_count(&program, request, as_of, false)?;
        let resolution = program.ladder.resolve(visits);

        Ok(LoyaltyOverview {
            business_id: program.business_id,
            business_name: program.name,
            locality: program.locality,
            window_days: program.window_days,
            qualifying_visits: visits,
            current_tier: resolution.current,
            next_tier: resolution.next,
            tiers: program.ladder.tiers().to_vec(),
            progress_to_next_percent: resolution.progress_percent,
        })
    }

    /// Price a receipt at settlement time.
    ///
    /// Tier selection uses the same policy as [`Self::overview`], applied
    /// with a visit count inclusive of the triggering visit: ledger-derived
    /// counts gain one for the in-flight receipt, explicit overrides are
    /// taken as already inclusive.
    pub fn quote(
        &self,
        business: &BusinessId,
        request: &VisitCountRequest,
        receipt_cents: u64,
        as_of: DateTime<Utc>,
    ) -> Result<PayoutQuote, LoyaltyServiceError> {
        let program = self.program(business)?;
        let visits = self.visit_count(&program, request, as_of, true)?;
        let resolution = program.ladder.resolve(visits);
        let payout_cents = compute_payout(
            resolution.current.as_ref(),
            receipt_cents,
            program.per_visit_cap_cents,
        );

        Ok(PayoutQuote {
            business_id: program.business_id,
            qualifying_visits: visits,
            receipt_cents,
            tier: resolution.current,
            payout_cents,
            cap_cents: program.per_visit_cap_cents,
        })
    }

    /// Convenience over [`Self::quote`] for decimal-string receipt totals.
    /// Malformed and negative amounts are rejected rather than zeroed.
    pub fn quote_amount(
        &self,
        business: &BusinessId,
        request: &VisitCountRequest,
        receipt_amount: &str,
        as_of: DateTime<Utc>,
    ) -> Result<PayoutQuote, LoyaltyServiceError> {
        let cents = parse_cents(receipt_amount)?;
        let cents = u64::try_from(cents)
            .map_err(|_| LoyaltyServiceError::NegativeReceipt(receipt_amount.to_string()))?;
        self.quote(business, request, cents, as_of)
    }

    fn program(&self, business: &BusinessId) -> Result<BusinessProgram, LoyaltyServiceError> {
        self.directory
            .program_for(business)?
            .ok_or_else(|| LoyaltyServiceError::UnknownBusiness(business.clone()))
    }

    fn visit_count(
        &self,
        program: &BusinessProgram,
        request: &VisitCountRequest,
        as_of: DateTime<Utc>,
        include_triggering_visit: bool,
    ) -> Result<u32, LoyaltyServiceError> {
        if let Some(visits) = request.visits {
            return Ok(visits);
        }

        let Some(patron) = &request.patron else {
            return Ok(u32::from(include_triggering_visit));
        };

        let counted =
            self.directory
                .qualifying_visits(&program.business_id, patron, as_of)?;
        Ok(counted.saturating_add(u32::from(include_triggering_visit)))
    }
}

/// Error raised by the loyalty service.
#[derive(Debug, thiserror::Error)]
pub enum LoyaltyServiceError {
    #[error("no business '{0}' in the directory")]
    UnknownBusiness(BusinessId),
    #[error("receipt amount '{0}' is negative")]
    NegativeReceipt(String),
    #[error(transparent)]
    Amount(#[from] MoneyError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
