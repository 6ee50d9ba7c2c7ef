//! Coverage statistics over both sources

use crate::record::{key_of, CanonicalRecord, JoinKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cardinality statistics for one reconciliation run
///
/// A site is a `(url, username)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub legacy_total: usize,
    pub reference_total: usize,
    pub legacy_sites: usize,
    pub reference_sites: usize,
    pub legacy_usernames: usize,
    pub reference_usernames: usize,
    pub legacy_passwords: usize,
    pub reference_passwords: usize,
    pub sites_only_in_legacy: usize,
    pub sites_only_in_reference: usize,
    pub sites_in_both: usize,
}

impl StatsRecord {
    /// Labelled per-source counts in report order
    pub fn source_counts(&self) -> [(&'static str, usize); 8] {
        [
            ("Legacy records", self.legacy_total),
            ("Reference records", self.reference_total),
            ("Legacy sites", self.legacy_sites),
            ("Reference sites", self.reference_sites),
            ("Legacy distinct usernames", self.legacy_usernames),
            ("Reference distinct usernames", self.reference_usernames),
            ("Legacy distinct passwords", self.legacy_passwords),
            ("Reference distinct passwords", self.reference_passwords),
        ]
    }

    /// Labelled cross-source site counts in report order
    pub fn site_overlap(&self) -> [(&'static str, usize); 3] {
        [
            ("Sites only in legacy", self.sites_only_in_legacy),
            ("Sites only in reference", self.sites_only_in_reference),
            ("Sites in both", self.sites_in_both),
        ]
    }
}

/// Distinct values of one source
struct SourceSets<'a> {
    sites: HashSet<JoinKey>,
    usernames: HashSet<&'a str>,
    passwords: HashSet<&'a str>,
}

impl<'a> SourceSets<'a> {
    fn collect(records: &'a [CanonicalRecord]) -> Self {
        Self {
            sites: records.iter().map(key_of).collect(),
            usernames: records.iter().map(|r| r.username.as_str()).collect(),
            passwords: records.iter().map(|r| r.password.as_str()).collect(),
        }
    }
}

/// Compute statistics over normalized legacy and reference records
pub fn aggregate(legacy: &[CanonicalRecord], reference: &[CanonicalRecord]) -> StatsRecord {
    let lp = SourceSets::collect(legacy);
    let rf = SourceSets::collect(reference);

    StatsRecord {
        legacy_total: legacy.len(),
        reference_total: reference.len(),
        legacy_sites: lp.sites.len(),
        reference_sites: rf.sites.len(),
        legacy_usernames: lp.usernames.len(),
        reference_usernames: rf.usernames.len(),
        legacy_passwords: lp.passwords.len(),
        reference_passwords: rf.passwords.len(),
        sites_only_in_legacy: lp.sites.difference(&rf.sites).count(),
        sites_only_in_reference: rf.sites.difference(&lp.sites).count(),
        sites_in_both: lp.sites.intersection(&rf.sites).count(),
    }
}
