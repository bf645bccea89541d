// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cadence::next_due_date;
use crate::error::ValidationError;
use crate::ledger::PaymentLedger;

fn normalize_token(s: &str) -> String {
    s.trim().to_uppercase().replace('-', "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Streaming,
    Games,
    Mobile,
    Service,
    Saas,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Streaming,
        Category::Games,
        Category::Mobile,
        Category::Service,
        Category::Saas,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Streaming => "STREAMING",
            Category::Games => "GAMES",
            Category::Mobile => "MOBILE",
            Category::Service => "SERVICE",
            Category::Saas => "SAAS",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| ValidationError::UnknownCategory(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cadence {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Cadence {
    pub const ALL: [Cadence; 5] = [
        Cadence::Weekly,
        Cadence::Monthly,
        Cadence::Quarterly,
        Cadence::SemiAnnual,
        Cadence::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Weekly => "WEEKLY",
            Cadence::Monthly => "MONTHLY",
            Cadence::Quarterly => "QUARTERLY",
            Cadence::SemiAnnual => "SEMI_ANNUAL",
            Cadence::Annual => "ANNUAL",
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Cadence::Weekly => 52,
            Cadence::Monthly => 12,
            Cadence::Quarterly => 4,
            Cadence::SemiAnnual => 2,
            Cadence::Annual => 1,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        Cadence::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| ValidationError::UnknownCadence(s.trim().to_string()))
    }
}

macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum_sql!(Category);
text_enum_sql!(Cadence);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub paid_on: NaiveDate,
    pub covered_due_date: NaiveDate,
}

// The store assigns the id
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub owner_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category: Category,
    pub cadence: Cadence,
    pub due_date: NaiveDate,
}

impl NewSubscription {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_amount(self.amount)
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

// Covered dates strictly increase, paid dates never go back, and the current
// due date lies past the last covered one.
fn check_ledger(events: &[PaymentEvent], due_date: NaiveDate) -> Result<(), ValidationError> {
    for pair in events.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.covered_due_date <= prev.covered_due_date {
            return Err(ValidationError::LedgerNotAdvancing {
                prev: prev.covered_due_date,
                next: next.covered_due_date,
            });
        }
        if next.paid_on < prev.paid_on {
            return Err(ValidationError::PaidOnOutOfOrder {
                prev: prev.paid_on,
                next: next.paid_on,
            });
        }
    }
    match events.last() {
        Some(last) if due_date <= last.covered_due_date => {
            Err(ValidationError::DueNotAfterLastPayment {
                due: due_date,
                covered: last.covered_due_date,
            })
        }
        _ => Ok(()),
    }
}

/// A tracked subscription together with its payment ledger.
///
/// `due_date` only moves through [`Subscription::confirm_payment`], and the
/// ledger only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    id: i64,
    owner_id: i64,
    name: String,
    amount: Decimal,
    category: Category,
    cadence: Cadence,
    due_date: NaiveDate,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    history: PaymentLedger,
    #[serde(skip)]
    version: i64,
}

fn default_active() -> bool {
    true
}

impl Subscription {
    pub fn new(id: i64, new: NewSubscription) -> Result<Self, ValidationError> {
        new.validate()?;
        Ok(Subscription {
            id,
            owner_id: new.owner_id,
            name: new.name.trim().to_string(),
            amount: new.amount,
            category: new.category,
            cadence: new.cadence,
            due_date: new.due_date,
            active: true,
            history: PaymentLedger::default(),
            version: 0,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: i64,
        owner_id: i64,
        name: String,
        amount: Decimal,
        category: Category,
        cadence: Cadence,
        due_date: NaiveDate,
        active: bool,
        history: PaymentLedger,
        version: i64,
    ) -> Self {
        Subscription {
            id,
            owner_id,
            name,
            amount,
            category,
            cadence,
            due_date,
            active,
            history,
            version,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn history(&self) -> &PaymentLedger {
        &self.history
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    pub(crate) fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// Re-checks the field and ledger rules; used on records that did not
    /// come through [`Subscription::new`], e.g. deserialized imports.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_amount(self.amount)?;
        check_ledger(self.history.as_slice(), self.due_date)
    }

    /// Settles the current due date and advances it by one cadence step.
    ///
    /// The next date is computed before anything is touched, so on error the
    /// record is left exactly as it was.
    pub fn confirm_payment(&mut self, paid_on: NaiveDate) -> Result<PaymentEvent, ValidationError> {
        if let Some(last) = self.history.last() {
            if paid_on < last.paid_on {
                return Err(ValidationError::PaidBeforeLastPayment {
                    paid_on,
                    last: last.paid_on,
                });
            }
        }
        let next = next_due_date(self.due_date, self.cadence)?;
        let event = PaymentEvent {
            paid_on,
            covered_due_date: self.due_date,
        };
        self.history.append(event);
        self.due_date = next;
        Ok(event)
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        check_name(name)?;
        self.name = name.trim().to_string();
        Ok(())
    }

    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        check_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.cadence = cadence;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
