// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, Months, NaiveDate};

use crate::error::ValidationError;
use crate::models::Cadence;

/// Next due date after `current` for the given cadence.
///
/// Month-based steps clamp to the last day of the target month, so
/// 2024-01-31 + MONTHLY is 2024-02-29 rather than a date in March. The result
/// is always strictly later than `current`.
pub fn next_due_date(current: NaiveDate, cadence: Cadence) -> Result<NaiveDate, ValidationError> {
    let next = match cadence {
        Cadence::Weekly => current.checked_add_days(Days::new(7)),
        Cadence::Monthly => current.checked_add_months(Months::new(1)),
        Cadence::Quarterly => current.checked_add_months(Months::new(3)),
        Cadence::SemiAnnual => current.checked_add_months(Months::new(6)),
        Cadence::Annual => current.checked_add_months(Months::new(12)),
    };
    next.ok_or(ValidationError::DateOverflow(current))
}

pub fn advance(start: NaiveDate, cadence: Cadence, steps: u32) -> Result<NaiveDate, ValidationError> {
    (0..steps).try_fold(start, |d, _| next_due_date(d, cadence))
}
