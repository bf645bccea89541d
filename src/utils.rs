// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::ranker::DEFAULT_WINDOW_DAYS;

pub const OWNER_KEY: &str = "owner_id";
pub const WINDOW_KEY: &str = "due_window_days";
pub const CURRENCY_KEY: &str = "currency";
pub const SETTING_KEYS: [&str; 3] = [OWNER_KEY, WINDOW_KEY, CURRENCY_KEY];

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        OWNER_KEY => {
            value
                .parse::<i64>()
                .with_context(|| format!("Invalid owner id '{}'", value))?;
        }
        WINDOW_KEY => {
            let days = value
                .parse::<i64>()
                .with_context(|| format!("Invalid window '{}', expected whole days", value))?;
            if days < 0 {
                return Err(anyhow!("Window must not be negative, got {}", days));
            }
        }
        CURRENCY_KEY => {
            if value.is_empty() {
                return Err(anyhow!("Currency must not be empty"));
            }
        }
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (expected one of {})",
                other,
                SETTING_KEYS.join(", ")
            ));
        }
    }
    let value = if key == CURRENCY_KEY {
        value.to_uppercase()
    } else {
        value.to_string()
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_owner_id(conn: &Connection) -> Result<i64> {
    match get_setting(conn, OWNER_KEY)? {
        Some(s) => s
            .parse()
            .with_context(|| format!("Invalid stored owner id '{}'", s)),
        None => Ok(1),
    }
}

pub fn get_window_days(conn: &Connection) -> Result<i64> {
    match get_setting(conn, WINDOW_KEY)? {
        Some(s) => s
            .parse()
            .with_context(|| format!("Invalid stored window '{}'", s)),
        None => Ok(DEFAULT_WINDOW_DAYS),
    }
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY_KEY)?.unwrap_or_else(|| "USD".to_string()))
}

pub fn resolve_owner(conn: &Connection, m: &clap::ArgMatches) -> Result<i64> {
    match m.try_get_one::<i64>("owner").ok().flatten() {
        Some(id) => Ok(*id),
        None => get_owner_id(conn),
    }
}
