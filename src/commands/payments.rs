// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StoreError;
use crate::models::PaymentEvent;
use crate::service;
use crate::store::SqliteStore;
use crate::utils::{maybe_print_json, parse_date, pretty_table, resolve_owner, today};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let paid_on = match sub.get_one::<String>("on") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let store = SqliteStore::new(conn);
    match service::confirm_payment(&store, owner_id, id, paid_on) {
        Ok(s) => {
            let covered = s
                .history()
                .last()
                .map(|e| e.covered_due_date.to_string())
                .unwrap_or_default();
            println!(
                "Paid '{}' on {} (covers {}); next due {}",
                s.name(),
                paid_on,
                covered,
                s.due_date()
            );
            Ok(())
        }
        Err(e @ StoreError::Conflict { .. }) => Err(anyhow!(
            "{}; it changed while the payment was being recorded, nothing was saved. Try again.",
            e
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    let s = service::load_owned(&store, owner_id, id)?;

    let mut events: Vec<PaymentEvent> = s.history().iter().copied().collect();
    if sub.get_flag("latest_first") {
        events.reverse();
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &events)? {
        if events.is_empty() {
            println!("No payments recorded for '{}'", s.name());
            return Ok(());
        }
        let rows = events
            .iter()
            .map(|e| vec![e.paid_on.to_string(), e.covered_due_date.to_string()])
            .collect();
        println!("{}", pretty_table(&["Paid on", "Covers due date"], rows));
    }
    Ok(())
}
