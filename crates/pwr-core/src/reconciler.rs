//! Reconciliation of legacy records against the reference store

use crate::record::{key_of, CanonicalRecord, JoinKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference records indexed by join key
///
/// Duplicate keys resolve last-write-wins: a later reference row replaces an
/// earlier one with the same `(url, username)`. Replacements are counted but
/// never treated as an error.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex<'a> {
    by_key: HashMap<JoinKey, &'a CanonicalRecord>,
    overwritten: usize,
}

impl<'a> ReferenceIndex<'a> {
    /// Build the index over reference records in input order
    pub fn build(reference: &'a [CanonicalRecord]) -> Self {
        let mut by_key = HashMap::with_capacity(reference.len());
        let mut overwritten = 0;

        for record in reference {
            if by_key.insert(key_of(record), record).is_some() {
                overwritten += 1;
            }
        }

        if overwritten > 0 {
            log::debug!(
                "{} reference rows shared a key with an earlier row; later rows win",
                overwritten
            );
        }

        Self {
            by_key,
            overwritten,
        }
    }

    /// Look up the reference record for a key
    pub fn get(&self, key: &JoinKey) -> Option<&'a CanonicalRecord> {
        self.by_key.get(key).copied()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Number of reference rows replaced by a later row with the same key
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

/// A legacy record whose matching reference record disagrees on a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    /// The legacy-side values (what gets reported)
    pub legacy: CanonicalRecord,
    /// The reference record it was matched against
    pub reference: CanonicalRecord,
}

impl Divergence {
    pub fn password_differs(&self) -> bool {
        self.legacy.password != self.reference.password
    }

    pub fn note_differs(&self) -> bool {
        self.legacy.note != self.reference.note
    }
}

/// Outcome of comparing legacy records against reference records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Legacy records with no reference record for their key, in legacy order
    pub only_in_legacy: Vec<CanonicalRecord>,
    /// Legacy records whose reference match differs in password or note,
    /// in legacy order
    pub differing: Vec<Divergence>,
}

impl ReconciliationResult {
    /// Legacy-side records of the differing set, in legacy order
    pub fn differing_records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.differing.iter().map(|d| &d.legacy)
    }

    /// True when no legacy record needs attention
    pub fn is_clean(&self) -> bool {
        self.only_in_legacy.is_empty() && self.differing.is_empty()
    }
}

/// Classify each legacy record against the reference set
///
/// Unmatched records go to `only_in_legacy`. Matched records whose
/// `password` or `note` differ (exact, case-sensitive comparison) go to
/// `differing`. Matched records that agree are dropped. Duplicate legacy
/// records are classified independently.
pub fn reconcile(
    legacy: &[CanonicalRecord],
    reference: &[CanonicalRecord],
) -> ReconciliationResult {
    let index = ReferenceIndex::build(reference);
    reconcile_with_index(legacy, &index)
}

/// Classify legacy records against a prebuilt reference index
pub fn reconcile_with_index(
    legacy: &[CanonicalRecord],
    index: &ReferenceIndex<'_>,
) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();
    let mut unchanged = 0;

    for record in legacy {
        match index.get(&key_of(record)) {
            None => result.only_in_legacy.push(record.clone()),
            Some(matched) => {
                if record.password != matched.password || record.note != matched.note {
                    result.differing.push(Divergence {
                        legacy: record.clone(),
                        reference: matched.clone(),
                    });
                } else {
                    unchanged += 1;
                }
            }
        }
    }

    log::info!(
        "Reconciled {} legacy records: {} only in legacy, {} differing, {} unchanged",
        legacy.len(),
        result.only_in_legacy.len(),
        result.differing.len(),
        unchanged
    );

    result
}
