// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ranker::Urgency;
use crate::service;
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, get_currency, get_window_days, maybe_print_json, parse_date, pretty_table,
    resolve_owner, today,
};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct DueRow {
    pub position: usize,
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub due_date: String,
    pub days_remaining: i64,
    pub urgency: Urgency,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<DueRow>> {
    let owner_id = resolve_owner(conn, sub)?;
    let window = match sub.get_one::<i64>("window") {
        Some(w) => *w,
        None => get_window_days(conn)?,
    };
    if window < 0 {
        return Err(anyhow!("Window must not be negative, got {}", window));
    }
    let as_of = match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s)?,
        None => today(),
    };

    let store = SqliteStore::new(conn);
    let ranked = service::due_soon(&store, owner_id, as_of, window)?;
    Ok(ranked
        .into_iter()
        .enumerate()
        .map(|(i, (s, days))| DueRow {
            position: i + 1,
            id: s.id(),
            name: s.name().to_string(),
            amount: s.amount(),
            due_date: s.due_date().to_string(),
            days_remaining: days,
            urgency: Urgency::from_days(days),
        })
        .collect())
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("All caught up: nothing due in the selected window");
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                format!("#{}", r.position),
                r.id.to_string(),
                r.name,
                fmt_money(&r.amount, &ccy),
                r.due_date,
                r.urgency.label(r.days_remaining),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Queue", "ID", "Name", "Amount", "Due", "When"], rows)
    );
    Ok(())
}
