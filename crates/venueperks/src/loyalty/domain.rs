use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// One reward band: a qualifying-visit range paired with a payout percentage.
///
/// `percent_bps` is expressed in basis points (500 = 5.00%). `max_visits` of
/// `None` marks an open-ended top band. `label` is display-only and never
/// affects computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub index: u32,
    pub min_visits: u32,
    pub max_visits: Option<u32>,
    pub percent_bps: u32,
    #[serde(default)]
    pub label: Option<String>,
}

impl Tier {
    /// Whether `visits` falls inside this band's inclusive range.
    pub fn contains(&self, visits: u32) -> bool {
        if visits < self.min_visits {
            return false;
        }
        match self.max_visits {
            Some(max) => visits <= max,
            None => true,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upper = match self.max_visits {
            Some(max) => max.to_string(),
            None => "∞".to_string(),
        };
        write!(
            f,
            "tier {} [{}..{}] {:.2}%",
            self.index,
            self.min_visits,
            upper,
            self.percent_bps as f64 / 100.0
        )
    }
}

/// The ordered set of reward bands configured for one business.
///
/// An empty ladder is valid and means "no loyalty program configured".
/// Construction canonicalizes ordering but never rejects a malformed ladder;
/// misconfiguration is surfaced as advisory [`LadderIssue`]s and resolved
/// deterministically at lookup time, because a bad ladder must never take a
/// page render down with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierLadder {
    tiers: Vec<Tier>,
}

impl TierLadder {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a ladder from records as delivered by storage, which may arrive
    /// unordered or malformed. Sorts ascending by `index` and logs any
    /// advisory issues found.
    pub fn from_records(mut records: Vec<Tier>) -> Self {
        records.sort_by_key(|tier| tier.index);
        let ladder = Self { tiers: records };
        for issue in ladder.audit() {
            warn!(%issue, "loyalty ladder misconfiguration");
        }
        ladder
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Bands in canonical order, ascending by `index`.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn first(&self) -> Option<&Tier> {
        self.tiers.first()
    }

    /// Advisory structural check. Issues are reported, never fatal: the
    /// resolver's tie-break rules keep lookups deterministic regardless.
    pub fn audit(&self) -> Vec<LadderIssue> {
        let mut issues = Vec::new();

        for tier in &self.tiers {
            if tier.percent_bps > 10_000 {
                issues.push(LadderIssue::PercentOutOfRange {
                    index: tier.index,
                    percent_bps: tier.percent_bps,
                });
            }
            if let Some(max) = tier.max_visits {
                if max < tier.min_visits {
                    issues.push(LadderIssue::InvertedBand { index: tier.index });
                }
            }
        }

        for pair in self.tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.index == upper.index {
                issues.push(LadderIssue::DuplicateIndex { index: lower.index });
            }
            if upper.min_visits <= lower.min_visits {
                issues.push(LadderIssue::NonMonotonicMinVisits {
                    index: upper.index,
                    min_visits: upper.min_visits,
                });
                continue;
            }
            match lower.max_visits {
                Some(max) if max >= upper.min_visits => {
                    issues.push(LadderIssue::OverlappingBands {
                        lower: lower.index,
                        upper: upper.index,
                    });
                }
                Some(max) if max < upper.min_visits - 1 => {
                    issues.push(LadderIssue::GapBetweenBands {
                        lower: lower.index,
                        upper: upper.index,
                    });
                }
                Some(_) => {}
                // An unbounded band below another band always overlaps it.
                None => issues.push(LadderIssue::OverlappingBands {
                    lower: lower.index,
                    upper: upper.index,
                }),
            }
        }

        issues
    }
}

/// Advisory finding from [`TierLadder::audit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LadderIssue {
    DuplicateIndex { index: u32 },
    NonMonotonicMinVisits { index: u32, min_visits: u32 },
    OverlappingBands { lower: u32, upper: u32 },
    GapBetweenBands { lower: u32, upper: u32 },
    PercentOutOfRange { index: u32, percent_bps: u32 },
    InvertedBand { index: u32 },
}

impl fmt::Display for LadderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LadderIssue::DuplicateIndex { index } => {
                write!(f, "duplicate tier index {index}")
            }
            LadderIssue::NonMonotonicMinVisits { index, min_visits } => {
                write!(
                    f,
                    "tier {index} min_visits {min_visits} does not increase over the band below"
                )
            }
            LadderIssue::OverlappingBands { lower, upper } => {
                write!(f, "tiers {lower} and {upper} overlap")
            }
            LadderIssue::GapBetweenBands { lower, upper } => {
                write!(f, "visit gap between tiers {lower} and {upper}")
            }
            LadderIssue::PercentOutOfRange { index, percent_bps } => {
                write!(f, "tier {index} percent {percent_bps} bps exceeds 10000")
            }
            LadderIssue::InvertedBand { index } => {
                write!(f, "tier {index} max_visits below min_visits")
            }
        }
    }
}
