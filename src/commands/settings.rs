// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    get_currency, get_owner_id, get_window_days, pretty_table, set_setting, CURRENCY_KEY,
    OWNER_KEY, WINDOW_KEY,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec![OWNER_KEY.to_string(), get_owner_id(conn)?.to_string()],
                vec![WINDOW_KEY.to_string(), get_window_days(conn)?.to_string()],
                vec![CURRENCY_KEY.to_string(), get_currency(conn)?],
                vec!["database".to_string(), crate::db::db_path()?.display().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            set_setting(conn, key, value)?;
            println!("Set {} = {}", key, value.trim());
        }
        _ => {}
    }
    Ok(())
}
