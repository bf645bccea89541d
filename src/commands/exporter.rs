// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{SqliteStore, SubscriptionStore};
use crate::utils::resolve_owner;
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("subscriptions", sub)) => export_subscriptions(conn, sub),
        _ => Ok(()),
    }
}

fn export_subscriptions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let owner_id = resolve_owner(conn, sub)?;
    let store = SqliteStore::new(conn);
    let records = store.list_all(owner_id)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id", "name", "amount", "category", "cadence", "due_date", "active", "payments",
                "last_paid_on",
            ])?;
            for s in &records {
                wtr.write_record([
                    s.id().to_string(),
                    s.name().to_string(),
                    s.amount().to_string(),
                    s.category().to_string(),
                    s.cadence().to_string(),
                    s.due_date().to_string(),
                    s.is_active().to_string(),
                    s.history().len().to_string(),
                    s.history()
                        .last()
                        .map(|e| e.paid_on.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} subscription(s) to {}", records.len(), out);
    Ok(())
}
