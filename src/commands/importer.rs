// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Subscription;
use crate::store::SqliteStore;
use crate::utils::resolve_owner;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("subscriptions", sub)) => import_subscriptions(conn, sub),
        _ => Ok(()),
    }
}

// Re-owned with fresh ids; due dates and history kept. One transaction.
fn import_subscriptions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
    let records: Vec<Subscription> =
        serde_json::from_str(&raw).with_context(|| format!("Parse subscriptions from {}", path))?;
    let owner_id = resolve_owner(conn, sub)?;

    let tx = conn.transaction()?;
    {
        let store = SqliteStore::new(&tx);
        for (i, rec) in records.iter().enumerate() {
            let rec = rec.clone().with_owner(owner_id);
            store
                .insert_with_history(&rec)
                .with_context(|| format!("Record {} ('{}')", i + 1, rec.name()))?;
        }
    }
    tx.commit()?;
    println!("Imported {} subscription(s) from {}", records.len(), path);
    Ok(())
}
