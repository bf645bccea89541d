// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{StoreError, ValidationError};
use crate::models::{Cadence, Category, Subscription};
use crate::ranker::{cmp_names, rank};
use crate::store::SubscriptionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Price,
    DueDate,
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "duedate" | "due-date" | "due_date" | "due" => Ok(SortKey::DueDate),
            other => Err(ValidationError::UnknownSortKey(other.to_string())),
        }
    }
}

// None leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub cadence: Option<Cadence>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.cadence.is_none()
    }
}

// Someone else's record is reported as missing
pub fn load_owned<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    id: i64,
) -> Result<Subscription, StoreError> {
    let record = store.load(id)?;
    if record.owner_id() != owner_id {
        return Err(StoreError::NotFound(id));
    }
    Ok(record)
}

/// Records a payment on `paid_on` and persists the advanced record.
pub fn confirm_payment<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    id: i64,
    paid_on: NaiveDate,
) -> Result<Subscription, StoreError> {
    let mut record = load_owned(store, owner_id, id)?;
    let event = record.confirm_payment(paid_on)?;
    store.save(&mut record)?;
    log::info!(
        "payment for subscription {} covering {} recorded; next due {}",
        id,
        event.covered_due_date,
        record.due_date()
    );
    Ok(record)
}

pub fn update<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    id: i64,
    patch: SubscriptionPatch,
) -> Result<Subscription, StoreError> {
    let mut record = load_owned(store, owner_id, id)?;
    if let Some(name) = patch.name.as_deref() {
        record.rename(name)?;
    }
    if let Some(amount) = patch.amount {
        record.set_amount(amount)?;
    }
    if let Some(category) = patch.category {
        record.set_category(category);
    }
    if let Some(cadence) = patch.cadence {
        record.set_cadence(cadence);
    }
    store.save(&mut record)?;
    Ok(record)
}

pub fn set_active<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    id: i64,
    active: bool,
) -> Result<Subscription, StoreError> {
    let mut record = load_owned(store, owner_id, id)?;
    if record.is_active() != active {
        record.set_active(active);
        store.save(&mut record)?;
    }
    Ok(record)
}

pub fn delete<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    id: i64,
) -> Result<(), StoreError> {
    load_owned(store, owner_id, id)?;
    store.delete(id)
}

pub fn due_soon<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    today: NaiveDate,
    window_days: i64,
) -> Result<Vec<(Subscription, i64)>, StoreError> {
    let records = store.list_active(owner_id)?;
    Ok(rank(&records, today, window_days)
        .into_iter()
        .map(|item| (item.record.clone(), item.days_remaining))
        .collect())
}

pub fn search_by_name<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    query: &str,
) -> Result<Vec<Subscription>, StoreError> {
    let needle = query.trim().to_lowercase();
    Ok(store
        .list_all(owner_id)?
        .into_iter()
        .filter(|s| s.name().to_lowercase().contains(&needle))
        .collect())
}

pub fn sorted<S: SubscriptionStore + ?Sized>(
    store: &S,
    owner_id: i64,
    key: SortKey,
    include_paused: bool,
) -> Result<Vec<Subscription>, StoreError> {
    let mut records = if include_paused {
        store.list_all(owner_id)?
    } else {
        store.list_active(owner_id)?
    };
    sort_records(&mut records, key);
    Ok(records)
}

// Stable; equal records keep creation order
pub fn sort_records(records: &mut [Subscription], key: SortKey) {
    match key {
        SortKey::Name => records.sort_by(|a, b| cmp_names(a.name(), b.name())),
        SortKey::Price => records.sort_by(|a, b| a.amount().cmp(&b.amount())),
        SortKey::DueDate => records.sort_by_key(|s| s.due_date()),
    }
}
