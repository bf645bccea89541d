// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Subscription;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    Today,
    Soon,
    Upcoming,
}

impl Urgency {
    pub fn from_days(days_remaining: i64) -> Self {
        match days_remaining {
            d if d < 0 => Urgency::Overdue,
            0 => Urgency::Today,
            1..=3 => Urgency::Soon,
            _ => Urgency::Upcoming,
        }
    }

    pub fn label(&self, days_remaining: i64) -> String {
        match self {
            Urgency::Overdue => format!("overdue by {} day(s)", -days_remaining),
            Urgency::Today => "due today".to_string(),
            Urgency::Soon if days_remaining == 1 => "due tomorrow".to_string(),
            _ => format!("in {} days", days_remaining),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DueItem<'a> {
    pub record: &'a Subscription,
    pub days_remaining: i64,
}

impl DueItem<'_> {
    pub fn urgency(&self) -> Urgency {
        Urgency::from_days(self.days_remaining)
    }
}

pub fn days_remaining(today: NaiveDate, due: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Case-insensitive name order; the raw name breaks remaining ties.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Orders records by how soon they fall due relative to `today`.
///
/// Every record with `days_remaining <= window_days` is kept, however far
/// overdue. Ties on the day count are broken by name, then id.
pub fn rank<'a, I>(records: I, today: NaiveDate, window_days: i64) -> Vec<DueItem<'a>>
where
    I: IntoIterator<Item = &'a Subscription>,
{
    let mut items: Vec<DueItem<'a>> = records
        .into_iter()
        .map(|record| DueItem {
            record,
            days_remaining: days_remaining(today, record.due_date()),
        })
        .filter(|item| item.days_remaining <= window_days)
        .collect();
    items.sort_by(|a, b| {
        a.days_remaining
            .cmp(&b.days_remaining)
            .then_with(|| cmp_names(a.record.name(), b.record.name()))
            .then_with(|| a.record.id().cmp(&b.record.id()))
    });
    items
}
