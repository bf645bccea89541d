// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected input or an impossible state transition on a subscription.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Subscription name must not be empty")]
    EmptyName,

    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Unknown category '{0}' (expected STREAMING|GAMES|MOBILE|SERVICE|SAAS|OTHER)")]
    UnknownCategory(String),

    #[error("Unknown cadence '{0}' (expected WEEKLY|MONTHLY|QUARTERLY|SEMI_ANNUAL|ANNUAL)")]
    UnknownCadence(String),

    #[error("Unknown sort key '{0}' (expected name|price|duedate)")]
    UnknownSortKey(String),

    #[error("Due date {0} cannot be advanced past the last representable date")]
    DateOverflow(NaiveDate),

    #[error("Payment date {paid_on} is before the last recorded payment on {last}")]
    PaidBeforeLastPayment { paid_on: NaiveDate, last: NaiveDate },

    #[error("Payment history must cover strictly later due dates: {next} follows {prev}")]
    LedgerNotAdvancing { prev: NaiveDate, next: NaiveDate },

    #[error("Payment history has paid dates out of order: {next} follows {prev}")]
    PaidOnOutOfOrder { prev: NaiveDate, next: NaiveDate },

    #[error("Due date {due} must be after the last covered due date {covered}")]
    DueNotAfterLastPayment { due: NaiveDate, covered: NaiveDate },
}

/// Failures surfaced by a [`crate::store::SubscriptionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Subscription {0} not found")]
    NotFound(i64),

    #[error("Subscription {id} was modified concurrently (expected version {expected})")]
    Conflict { id: i64, expected: i64 },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
