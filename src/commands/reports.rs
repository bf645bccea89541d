// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Subscription};
use crate::store::{SqliteStore, SubscriptionStore};
use crate::utils::{get_currency, maybe_print_json, pretty_table, resolve_owner};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryCost {
    pub category: String,
    pub subscriptions: usize,
    pub monthly: Decimal,
    pub yearly: Decimal,
}

pub fn yearly_cost(s: &Subscription) -> Decimal {
    s.amount() * Decimal::from(s.cadence().periods_per_year())
}

// Active subscriptions only, rounded to cents, TOTAL row last
pub fn cost_by_category(records: &[Subscription]) -> Vec<CategoryCost> {
    let mut agg: BTreeMap<Category, (usize, Decimal)> = BTreeMap::new();
    for s in records.iter().filter(|s| s.is_active()) {
        let entry = agg.entry(s.category()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += yearly_cost(s);
    }

    let twelve = Decimal::from(12);
    let mut total = (0usize, Decimal::ZERO);
    let mut out: Vec<CategoryCost> = agg
        .into_iter()
        .map(|(cat, (count, yearly))| {
            total.0 += count;
            total.1 += yearly;
            CategoryCost {
                category: cat.to_string(),
                subscriptions: count,
                monthly: (yearly / twelve).round_dp(2),
                yearly: yearly.round_dp(2),
            }
        })
        .collect();
    out.push(CategoryCost {
        category: "TOTAL".to_string(),
        subscriptions: total.0,
        monthly: (total.1 / twelve).round_dp(2),
        yearly: total.1.round_dp(2),
    });
    out
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let store = SqliteStore::new(conn);
    let records = store.list_active(owner_id)?;
    let data = cost_by_category(&records);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = get_currency(conn)?;
        let rows = data
            .into_iter()
            .map(|c| {
                vec![
                    c.category,
                    c.subscriptions.to_string(),
                    format!("{:.2}", c.monthly),
                    format!("{:.2}", c.yearly),
                ]
            })
            .collect();
        let monthly_hdr = format!("Monthly ({})", ccy);
        let yearly_hdr = format!("Yearly ({})", ccy);
        println!(
            "{}",
            pretty_table(&["Category", "Count", &monthly_hdr, &yearly_hdr], rows)
        );
    }
    Ok(())
}
