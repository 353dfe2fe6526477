//! Progressive payout tier engine.
//!
//! The engine is pure: the storage collaborator supplies a tier ladder and a
//! qualifying-visit count, the resolver picks the applicable band and progress
//! toward the next one, and the payout calculator turns a receipt total into a
//! cash reward in cents. Nothing in here performs I/O or mutates shared state.

pub mod directory;
pub mod domain;
pub mod money;
pub mod payout;
pub mod resolver;
pub mod router;
pub mod service;

pub use directory::{BusinessDirectory, BusinessId, BusinessProgram, DirectoryError, PatronId};
pub use domain::{LadderIssue, Tier, TierLadder};
pub use money::{number_to_cents, parse_cents, parse_cents_lenient, MoneyError};
pub use payout::compute_payout;
pub use resolver::TierResolution;
pub use router::loyalty_router;
pub use service::{
    LoyaltyOverview, LoyaltyService, LoyaltyServiceError, PayoutQuote, VisitCountRequest,
};
