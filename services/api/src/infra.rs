use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use venueperks::loyalty::{
    BusinessDirectory, BusinessId, BusinessProgram, DirectoryError, PatronId, Tier, TierLadder,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the hosted database: seeded venue catalog plus a
/// visit ledger keyed by (business, patron).
#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    programs: Arc<Mutex<HashMap<BusinessId, BusinessProgram>>>,
    visits: Arc<Mutex<HashMap<(BusinessId, PatronId), Vec<DateTime<Utc>>>>>,
}

impl InMemoryDirectory {
    pub(crate) fn insert_program(&self, program: BusinessProgram) {
        let mut guard = self.programs.lock().expect("program mutex poisoned");
        guard.insert(program.business_id.clone(), program);
    }

    pub(crate) fn record_visit(&self, business: &BusinessId, patron: &PatronId, at: DateTime<Utc>) {
        let mut guard = self.visits.lock().expect("visit mutex poisoned");
        guard
            .entry((business.clone(), patron.clone()))
            .or_default()
            .push(at);
    }
}

impl BusinessDirectory for InMemoryDirectory {
    fn program_for(&self, business: &BusinessId) -> Result<Option<BusinessProgram>, DirectoryError> {
        let guard = self.programs.lock().expect("program mutex poisoned");
        Ok(guard.get(business).cloned())
    }

    fn qualifying_visits(
        &self,
        business: &BusinessId,
        patron: &PatronId,
        as_of: DateTime<Utc>,
    ) -> Result<u32, DirectoryError> {
        let window_days = {
            let guard = self.programs.lock().expect("program mutex poisoned");
            match guard.get(business) {
                Some(program) => program.window_days,
                // No program means no window to count inside.
                None => return Ok(0),
            }
        };
        let cutoff = as_of - Duration::days(i64::from(window_days));

        let guard = self.visits.lock().expect("visit mutex poisoned");
        let count = guard
            .get(&(business.clone(), patron.clone()))
            .map(|stamps| {
                stamps
                    .iter()
                    .filter(|stamp| **stamp > cutoff && **stamp <= as_of)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u32)
    }
}

fn tier(index: u32, min: u32, max: Option<u32>, bps: u32, label: &str) -> Tier {
    Tier {
        index,
        min_visits: min,
        max_visits: max,
        percent_bps: bps,
        label: Some(label.to_string()),
    }
}

/// The ladder used by the demo and the `payout` subcommand when no ladder
/// file is given.
pub(crate) fn sample_ladder() -> TierLadder {
    TierLadder::from_records(vec![
        tier(0, 1, Some(2), 500, "Newcomer"),
        tier(1, 3, Some(4), 700, "Regular"),
        tier(2, 5, None, 1_000, "Local Legend"),
    ])
}

/// Seed a discovery-feed worth of venues with differing program shapes.
pub(crate) fn seed_directory(directory: &InMemoryDirectory, default_window_days: u32) {
    directory.insert_program(BusinessProgram {
        business_id: BusinessId("biz-fieldnote".to_string()),
        name: "Fieldnote Espresso".to_string(),
        locality: Some("River North".to_string()),
        ladder: sample_ladder(),
        per_visit_cap_cents: Some(500),
        window_days: default_window_days,
    });

    directory.insert_program(BusinessProgram {
        business_id: BusinessId("biz-copperline".to_string()),
        name: "Copperline Taproom".to_string(),
        locality: Some("West Loop".to_string()),
        ladder: TierLadder::from_records(vec![
            tier(0, 2, Some(5), 300, "Barstool"),
            tier(1, 6, None, 800, "Mug Club"),
        ]),
        per_visit_cap_cents: Some(1_000),
        window_days: default_window_days,
    });

    // No program configured yet; the overview still renders.
    directory.insert_program(BusinessProgram {
        business_id: BusinessId("biz-harvest".to_string()),
        name: "Harvest Table".to_string(),
        locality: Some("Logan Square".to_string()),
        ladder: TierLadder::empty(),
        per_visit_cap_cents: None,
        window_days: default_window_days,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_serves_programs() {
        let directory = InMemoryDirectory::default();
        seed_directory(&directory, 30);

        let program = directory
            .program_for(&BusinessId("biz-fieldnote".to_string()))
            .expect("directory available")
            .expect("program seeded");
        assert_eq!(program.name, "Fieldnote Espresso");
        assert_eq!(program.ladder.len(), 3);

        let missing = directory
            .program_for(&BusinessId("biz-ghost".to_string()))
            .expect("directory available");
        assert!(missing.is_none());
    }

    #[test]
    fn visit_ledger_counts_only_inside_the_window() {
        let directory = InMemoryDirectory::default();
        seed_directory(&directory, 30);
        let business = BusinessId("biz-fieldnote".to_string());
        let patron = PatronId("patron-ada".to_string());
        let now = Utc::now();

        directory.record_visit(&business, &patron, now - Duration::days(1));
        directory.record_visit(&business, &patron, now - Duration::days(29));
        directory.record_visit(&business, &patron, now - Duration::days(31));

        let count = directory
            .qualifying_visits(&business, &patron, now)
            .expect("ledger available");
        assert_eq!(count, 2);
    }

    #[test]
    fn unknown_business_counts_no_visits() {
        let directory = InMemoryDirectory::default();
        let business = BusinessId("biz-ghost".to_string());
        let patron = PatronId("patron-ada".to_string());
        let now = Utc::now();

        directory.record_visit(&business, &patron, now - Duration::days(1));

        let count = directory
            .qualifying_visits(&business, &patron, now)
            .expect("ledger available");
        assert_eq!(count, 0);
    }
}
