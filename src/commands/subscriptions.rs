// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Cadence, Category, NewSubscription, Subscription};
use crate::service::{self, SortKey, SubscriptionPatch};
use crate::store::{SqliteStore, SubscriptionStore};
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, parse_date, parse_decimal, pretty_table,
    resolve_owner,
};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("pause", sub)) => toggle(conn, sub, false)?,
        Some(("resume", sub)) => toggle(conn, sub, true)?,
        Some(("search", sub)) => search(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category: Category = sub.get_one::<String>("category").unwrap().parse()?;
    let cadence: Cadence = sub.get_one::<String>("cadence").unwrap().parse()?;
    let due_date = parse_date(sub.get_one::<String>("due").unwrap())?;

    let store = SqliteStore::new(conn);
    let created = store.create(NewSubscription {
        owner_id,
        name,
        amount,
        category,
        cadence,
        due_date,
    })?;
    println!(
        "Added subscription #{} '{}' ({} {}, next due {})",
        created.id(),
        created.name(),
        fmt_money(&created.amount(), &get_currency(conn)?),
        created.cadence(),
        created.due_date()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct SubscriptionRow {
    pub id: i64,
    pub name: String,
    pub amount: String,
    pub category: String,
    pub cadence: String,
    pub due_date: String,
    pub active: bool,
    pub payments: usize,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(s: &Subscription) -> Self {
        SubscriptionRow {
            id: s.id(),
            name: s.name().to_string(),
            amount: s.amount().to_string(),
            category: s.category().to_string(),
            cadence: s.cadence().to_string(),
            due_date: s.due_date().to_string(),
            active: s.is_active(),
            payments: s.history().len(),
        }
    }
}

fn print_rows(sub: &clap::ArgMatches, records: &[Subscription]) -> Result<()> {
    let data: Vec<SubscriptionRow> = records.iter().map(SubscriptionRow::from).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name,
                    r.amount,
                    r.category,
                    r.cadence,
                    r.due_date,
                    if r.active { "yes".into() } else { "paused".into() },
                    r.payments.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Category", "Cadence", "Due", "Active", "Payments"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Subscription>> {
    let owner_id = resolve_owner(conn, sub)?;
    let key: SortKey = match sub.get_one::<String>("sort") {
        Some(s) => s.parse()?,
        None => SortKey::default(),
    };
    let store = SqliteStore::new(conn);
    Ok(service::sorted(&store, owner_id, key, sub.get_flag("all"))?)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let records = query_rows(conn, sub)?;
    print_rows(sub, &records)
}

fn search(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let query = sub.get_one::<String>("name").unwrap();
    let store = SqliteStore::new(conn);
    let records = service::search_by_name(&store, owner_id, query)?;
    print_rows(sub, &records)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    let s = service::load_owned(&store, owner_id, id)?;
    let ccy = get_currency(conn)?;
    let last_paid = s
        .history()
        .last()
        .map(|e| e.paid_on.to_string())
        .unwrap_or_else(|| "never".to_string());
    let rows = vec![
        vec!["ID".into(), s.id().to_string()],
        vec!["Name".into(), s.name().to_string()],
        vec!["Amount".into(), fmt_money(&s.amount(), &ccy)],
        vec!["Category".into(), s.category().to_string()],
        vec!["Cadence".into(), s.cadence().to_string()],
        vec!["Next due".into(), s.due_date().to_string()],
        vec!["Active".into(), s.is_active().to_string()],
        vec!["Payments".into(), s.history().len().to_string()],
        vec!["Last paid".into(), last_paid],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = SubscriptionPatch {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        category: sub
            .get_one::<String>("category")
            .map(|s| s.parse::<Category>())
            .transpose()?,
        cadence: sub
            .get_one::<String>("cadence")
            .map(|s| s.parse::<Cadence>())
            .transpose()?,
    };
    if patch.is_empty() {
        return Err(anyhow!(
            "Nothing to change; pass --name, --amount, --category or --cadence"
        ));
    }
    let store = SqliteStore::new(conn);
    let updated = service::update(&store, owner_id, id, patch)?;
    println!("Updated subscription #{} '{}'", updated.id(), updated.name());
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    service::delete(&store, owner_id, id)?;
    println!("Removed subscription #{}", id);
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let owner_id = resolve_owner(conn, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    let s = service::set_active(&store, owner_id, id, active)?;
    let state = if active { "resumed" } else { "paused" };
    println!("Subscription #{} '{}' {}", s.id(), s.name(), state);
    Ok(())
}
