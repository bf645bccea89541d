// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Subscription;
use crate::store::{SqliteStore, SubscriptionStore};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Ledger consistency problems for one subscription, as (issue, detail).
pub fn check(s: &Subscription) -> Vec<(String, String)> {
    let mut issues = Vec::new();
    let events = s.history().as_slice();

    // 1) Covered due dates must strictly increase
    for pair in events.windows(2) {
        if pair[1].covered_due_date <= pair[0].covered_due_date {
            issues.push((
                "ledger_not_advancing".to_string(),
                format!(
                    "#{} {}: {} after {}",
                    s.id(),
                    s.name(),
                    pair[1].covered_due_date,
                    pair[0].covered_due_date
                ),
            ));
        }
        // 2) Payment dates should not go backwards
        if pair[1].paid_on < pair[0].paid_on {
            issues.push((
                "paid_on_out_of_order".to_string(),
                format!(
                    "#{} {}: paid {} after {}",
                    s.id(),
                    s.name(),
                    pair[1].paid_on,
                    pair[0].paid_on
                ),
            ));
        }
    }

    // 3) Current due date is past the last settled one
    if let Some(last) = events.last() {
        if s.due_date() <= last.covered_due_date {
            issues.push((
                "due_not_after_last_payment".to_string(),
                format!(
                    "#{} {}: due {} but last covered {}",
                    s.id(),
                    s.name(),
                    s.due_date(),
                    last.covered_due_date
                ),
            ));
        }
    }
    issues
}

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // Every owner, paused records included
    let mut stmt = conn.prepare("SELECT DISTINCT owner_id FROM subscriptions ORDER BY owner_id")?;
    let owners = stmt
        .query_map([], |r| r.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let store = SqliteStore::new(conn);
    for owner in owners {
        for s in store.list_all(owner)? {
            for (issue, detail) in check(&s) {
                rows.push(vec![issue, detail]);
            }
        }
    }

    // Ledger rows whose subscription is gone
    let orphans: i64 = conn.query_row(
        "SELECT COUNT(*) FROM payments WHERE subscription_id NOT IN (SELECT id FROM subscriptions)",
        [],
        |r| r.get(0),
    )?;
    if orphans > 0 {
        rows.push(vec!["orphan_payments".into(), orphans.to_string()]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
