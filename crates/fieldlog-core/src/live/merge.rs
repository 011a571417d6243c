//! Snapshot/pending merge logic

use std::collections::HashMap;

use crate::models::{Report, ReportId};

/// Merge the authoritative snapshot with locally-pending reports
///
/// The mapping is seeded from the snapshot, then every pending report is
/// overlaid keyed by id: a record freshly accepted by the remote but not yet
/// flipped locally appears in both sources, and the local entry wins so the
/// user keeps seeing their own pending submission. The result is sorted by
/// creation time descending (id breaks ties deterministically).
#[must_use]
pub fn merge_reports(authoritative: &[Report], pending: &[Report]) -> Vec<Report> {
    let mut by_id: HashMap<ReportId, &Report> =
        authoritative.iter().map(|report| (report.id, report)).collect();
    for report in pending {
        by_id.insert(report.id, report);
    }

    let mut merged: Vec<Report> = by_id.into_values().cloned().collect();
    merged.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SyncStatus;
    use pretty_assertions::assert_eq;

    fn report(created_at: i64) -> Report {
        Report {
            created_at,
            ..Report::new("Dock 2", "Kim", "Corrosion on north railing")
        }
    }

    #[test]
    fn test_merge_unions_both_sources() {
        let a = report(3000);
        let b = report(2000);
        let c = report(1000);

        let merged = merge_reports(&[a.clone(), b.clone()], &[c.clone()]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id, a.id);
        assert_eq!(merged[1].id, b.id);
        assert_eq!(merged[2].id, c.id);
    }

    #[test]
    fn test_local_pending_wins_on_duplicate_id() {
        // The remote already accepted the record, but locally it is still
        // pending: the local entry must take precedence, without duplicates
        let mut remote_copy = report(1000);
        remote_copy.status = SyncStatus::Synced;
        let mut local_copy = remote_copy.clone();
        local_copy.status = SyncStatus::Pending;
        local_copy.synced_at = None;

        let other = report(2000);
        let merged = merge_reports(&[remote_copy, other.clone()], &[local_copy.clone()]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, other.id);
        assert_eq!(merged[1], local_copy);
        assert_eq!(merged[1].status, SyncStatus::Pending);
    }

    #[test]
    fn test_merge_sorted_created_at_descending() {
        let oldest = report(1);
        let newest = report(3);
        let middle = report(2);

        let merged = merge_reports(&[oldest.clone(), newest.clone()], &[middle.clone()]);
        let order: Vec<i64> = merged.iter().map(|r| r.created_at).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_merge_of_empty_sources() {
        assert!(merge_reports(&[], &[]).is_empty());

        let only_pending = report(1000);
        let merged = merge_reports(&[], &[only_pending.clone()]);
        assert_eq!(merged, vec![only_pending]);
    }
}
