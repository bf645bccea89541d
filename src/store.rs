// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::ledger::PaymentLedger;
use crate::models::{Cadence, Category, NewSubscription, PaymentEvent, Subscription};

/// Durable storage for subscriptions.
///
/// `save` must persist the whole aggregate or nothing, and must refuse to
/// overwrite a record that changed since it was loaded.
pub trait SubscriptionStore {
    fn create(&self, new: NewSubscription) -> Result<Subscription, StoreError>;
    fn load(&self, id: i64) -> Result<Subscription, StoreError>;
    fn save(&self, record: &mut Subscription) -> Result<(), StoreError>;
    fn delete(&self, id: i64) -> Result<(), StoreError>;
    fn list_active(&self, owner_id: i64) -> Result<Vec<Subscription>, StoreError>;
    fn list_all(&self, owner_id: i64) -> Result<Vec<Subscription>, StoreError>;
}

const COLUMNS: &str = "id, owner_id, name, amount, category, cadence, due_date, active, version";

struct StoredRow {
    id: i64,
    owner_id: i64,
    name: String,
    amount: Decimal,
    category: Category,
    cadence: Cadence,
    due_date: NaiveDate,
    active: bool,
    version: i64,
}

impl StoredRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        let amount_s: String = r.get(3)?;
        let amount = amount_s
            .parse::<Decimal>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        Ok(StoredRow {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            name: r.get(2)?,
            amount,
            category: r.get(4)?,
            cadence: r.get(5)?,
            due_date: r.get(6)?,
            active: r.get(7)?,
            version: r.get(8)?,
        })
    }

    fn into_record(self, history: PaymentLedger) -> Subscription {
        Subscription::restore(
            self.id,
            self.owner_id,
            self.name,
            self.amount,
            self.category,
            self.cadence,
            self.due_date,
            self.active,
            history,
            self.version,
        )
    }
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }

    // Joins the caller's transaction when one is already open
    fn in_transaction<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if !self.conn.is_autocommit() {
            return f(self.conn);
        }
        let tx = self.conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    fn load_history(conn: &Connection, id: i64) -> rusqlite::Result<PaymentLedger> {
        let mut stmt = conn.prepare_cached(
            "SELECT paid_on, covered_due_date FROM payments WHERE subscription_id=?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![id], |r| {
            Ok(PaymentEvent {
                paid_on: r.get(0)?,
                covered_due_date: r.get(1)?,
            })
        })?;
        rows.collect()
    }

    fn append_events(
        conn: &Connection,
        id: i64,
        events: &[PaymentEvent],
        from: usize,
    ) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO payments(subscription_id, seq, paid_on, covered_due_date) VALUES (?1,?2,?3,?4)",
        )?;
        for (seq, e) in events.iter().enumerate().skip(from) {
            stmt.execute(params![id, seq as i64, e.paid_on, e.covered_due_date])?;
        }
        Ok(())
    }

    fn list(&self, owner_id: i64, active_only: bool) -> Result<Vec<Subscription>, StoreError> {
        let sql = if active_only {
            format!("SELECT {COLUMNS} FROM subscriptions WHERE owner_id=?1 AND active=1 ORDER BY id")
        } else {
            format!("SELECT {COLUMNS} FROM subscriptions WHERE owner_id=?1 ORDER BY id")
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner_id], StoredRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let history = Self::load_history(self.conn, row.id)?;
            out.push(row.into_record(history));
        }
        Ok(out)
    }

    // Imports: fresh id, history kept, incoming version ignored
    pub fn insert_with_history(&self, record: &Subscription) -> Result<Subscription, StoreError> {
        record.validate()?;
        self.in_transaction(|conn| {
            conn.execute(
                "INSERT INTO subscriptions(owner_id, name, amount, category, cadence, due_date, active)
                 VALUES (?1,?2,?3,?4,?5,?6,?7)",
                params![
                    record.owner_id(),
                    record.name(),
                    record.amount().to_string(),
                    record.category(),
                    record.cadence(),
                    record.due_date(),
                    record.is_active()
                ],
            )?;
            let id = conn.last_insert_rowid();
            Self::append_events(conn, id, record.history().as_slice(), 0)?;
            log::debug!(
                "imported subscription {} with {} payment(s)",
                id,
                record.history().len()
            );
            Ok(Subscription::restore(
                id,
                record.owner_id(),
                record.name().to_string(),
                record.amount(),
                record.category(),
                record.cadence(),
                record.due_date(),
                record.is_active(),
                record.history().clone(),
                0,
            ))
        })
    }
}

impl SubscriptionStore for SqliteStore<'_> {
    fn create(&self, new: NewSubscription) -> Result<Subscription, StoreError> {
        new.validate()?;
        self.conn.execute(
            "INSERT INTO subscriptions(owner_id, name, amount, category, cadence, due_date)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                new.owner_id,
                new.name.trim(),
                new.amount.to_string(),
                new.category,
                new.cadence,
                new.due_date
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("created subscription {} for owner {}", id, new.owner_id);
        Ok(Subscription::new(id, new)?)
    }

    fn load(&self, id: i64) -> Result<Subscription, StoreError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM subscriptions WHERE id=?1"),
                params![id],
                StoredRow::from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))?;
        let history = Self::load_history(self.conn, id)?;
        Ok(row.into_record(history))
    }

    fn save(&self, record: &mut Subscription) -> Result<(), StoreError> {
        let id = record.id();
        let expected = record.version();
        let snapshot: &Subscription = record;
        self.in_transaction(|conn| {
            let changed = conn.execute(
                "UPDATE subscriptions
                 SET name=?1, amount=?2, category=?3, cadence=?4, due_date=?5, active=?6,
                     version=version+1
                 WHERE id=?7 AND version=?8",
                params![
                    snapshot.name(),
                    snapshot.amount().to_string(),
                    snapshot.category(),
                    snapshot.cadence(),
                    snapshot.due_date(),
                    snapshot.is_active(),
                    id,
                    expected
                ],
            )?;
            if changed == 0 {
                let exists: Option<i64> = conn
                    .query_row(
                        "SELECT version FROM subscriptions WHERE id=?1",
                        params![id],
                        |r| r.get(0),
                    )
                    .optional()?;
                return Err(match exists {
                    Some(current) => {
                        log::warn!(
                            "save of subscription {} rejected: version {} != {}",
                            id,
                            current,
                            expected
                        );
                        StoreError::Conflict { id, expected }
                    }
                    None => StoreError::NotFound(id),
                });
            }

            let stored: i64 = conn.query_row(
                "SELECT COUNT(*) FROM payments WHERE subscription_id=?1",
                params![id],
                |r| r.get(0),
            )?;
            let stored = usize::try_from(stored).unwrap_or(0);
            let events = snapshot.history().as_slice();
            if stored > events.len() {
                return Err(StoreError::Conflict { id, expected });
            }
            Self::append_events(conn, id, events, stored)?;
            log::debug!(
                "saved subscription {} (version {}, {} new payment(s))",
                id,
                expected + 1,
                events.len() - stored
            );
            Ok(())
        })?;
        record.set_version(expected + 1);
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.in_transaction(|conn| {
            conn.execute(
                "DELETE FROM payments WHERE subscription_id=?1",
                params![id],
            )?;
            let n = conn.execute("DELETE FROM subscriptions WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(StoreError::NotFound(id));
            }
            log::debug!("deleted subscription {}", id);
            Ok(())
        })
    }

    fn list_active(&self, owner_id: i64) -> Result<Vec<Subscription>, StoreError> {
        self.list(owner_id, true)
    }

    fn list_all(&self, owner_id: i64) -> Result<Vec<Subscription>, StoreError> {
        self.list(owner_id, false)
    }
}
